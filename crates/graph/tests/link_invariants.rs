use modeldoc_graph::LinkBuilder;
use modeldoc_parser::{parse_model, Grammar, Model};
use proptest::prelude::*;

/// Random model text: `count` equations named e0..eN whose right-hand sides
/// mention a random subset of the names, sometimes glued to suffixes that
/// must not count as references.
fn model_text(refs: &[Vec<(usize, u8)>]) -> String {
    let count = refs.len();
    let mut text = String::from("ADDEQ,\n");
    for (i, targets) in refs.iter().enumerate() {
        let mut rhs = String::from("1");
        for &(target, style) in targets {
            let target = target % count;
            match style % 3 {
                0 => rhs.push_str(&format!(" + e{target}")),
                1 => rhs.push_str(&format!(" * log(E{target}(-1))")),
                _ => rhs.push_str(&format!(" + x_e{target}_r")),
            }
        }
        let sep = if i + 1 == count { ";" } else { "," };
        text.push_str(&format!("e{i}: e{i} = {rhs}{sep}\n"));
    }
    text
}

fn linked(text: &str) -> Model {
    let model = parse_model(&Grammar::new(), text, "prop.inp").expect("parse");
    LinkBuilder::new().link(model).model
}

proptest! {
    #[test]
    fn proptest_appears_in_is_transpose_of_variables(
        refs in prop::collection::vec(prop::collection::vec((0usize..12, any::<u8>()), 0..6), 1..12)
    ) {
        let model = linked(&model_text(&refs));
        for e in model.equations() {
            for f in model.equations() {
                if e.name == f.name {
                    continue;
                }
                prop_assert_eq!(
                    e.variables.contains(&f.name),
                    f.appears_in.contains(&e.name),
                    "{} / {}", e.name, f.name
                );
            }
            prop_assert!(!e.variables.contains(&e.name));
            prop_assert!(!e.appears_in.contains(&e.name));
        }
    }

    #[test]
    fn proptest_variables_are_exactly_the_bound_mentions(
        refs in prop::collection::vec(prop::collection::vec((0usize..12, any::<u8>()), 0..6), 1..12)
    ) {
        let count = refs.len();
        let model = linked(&model_text(&refs));
        for (i, targets) in refs.iter().enumerate() {
            let mut expected: Vec<usize> = targets
                .iter()
                .filter(|(_, style)| style % 3 != 2)
                .map(|(t, _)| t % count)
                .filter(|&t| t != i)
                .collect();
            expected.sort_unstable();
            expected.dedup();
            let expected: Vec<String> = expected.into_iter().map(|t| format!("e{t}")).collect();
            let eq = model.find(&format!("e{i}")).expect("equation");
            prop_assert_eq!(&eq.variables, &expected);
        }
    }
}

#[test]
fn parameter_example_links_before_substitution() {
    let model = linked("ADDEQ, x: x = y + 1.5, y: y = 2*x;");
    let y = model.find("y").unwrap();
    assert_eq!(y.appears_in, vec!["x"]);
    assert!(model
        .find("x")
        .unwrap()
        .whole_equation
        .contains(r##"<a href="#y">y</a>"##));
}
