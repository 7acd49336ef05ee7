use anyhow::Result;

fn main() -> Result<()> {
    modeldoc_cli::main_entry()
}
