use crate::config::OutputFormat;
use anyhow::{Context, Result};
use modeldoc_graph::AssembledModel;
use modeldoc_parser::markup::{segments, Segment};
use modeldoc_parser::{Equation, Region};
use serde::Serialize;

/// Turns an assembled model into the output document
pub trait Renderer {
    fn render(&self, model: &AssembledModel) -> Result<String>;
}

pub fn renderer_for(format: OutputFormat, title: &str) -> Box<dyn Renderer> {
    match format {
        OutputFormat::Html => Box::new(HtmlRenderer::new(title)),
        OutputFormat::Json => Box::new(JsonRenderer::new(title)),
    }
}

/// Self-contained HTML page, one section per region
pub struct HtmlRenderer {
    title: String,
}

impl HtmlRenderer {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    fn render_region(html: &mut String, region: &Region) {
        let heading = region.name.as_deref().unwrap_or("Equations");
        match region.placement {
            Some(placement) => html.push_str(&format!(
                "<section class=\"region\" data-placement=\"{}\">\n",
                placement.as_str()
            )),
            None => html.push_str("<section class=\"region\">\n"),
        }
        html.push_str(&format!("<h2>{}</h2>\n", escape_html(heading)));
        for equation in &region.equations {
            Self::render_equation(html, equation);
        }
        html.push_str("</section>\n");
    }

    fn render_equation(html: &mut String, equation: &Equation) {
        let name = escape_html(&equation.name);
        html.push_str(&format!("<div class=\"equation\" id=\"{name}\">\n"));
        html.push_str(&format!("<h3>{name}</h3>\n"));
        if let Some(legend) = &equation.legend {
            html.push_str(&format!("<p class=\"legend\">{}</p>\n", escape_html(legend)));
        }
        html.push_str(&format!(
            "<p class=\"formula\"><code>{}</code></p>\n",
            escape_outside_anchors(&equation.whole_equation)
        ));
        if !equation.variables.is_empty() {
            html.push_str(&format!(
                "<p class=\"variables\">Depends on: {}</p>\n",
                link_list(&equation.variables)
            ));
        }
        if !equation.appears_in.is_empty() {
            html.push_str(&format!(
                "<p class=\"appears-in\">Appears in: {}</p>\n",
                link_list(&equation.appears_in)
            ));
        }
        html.push_str("</div>\n");
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, model: &AssembledModel) -> Result<String> {
        let title = escape_html(&self.title);
        let stats = model.stats();

        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>{title}</title>\n"));
        html.push_str(STYLE);
        html.push_str("</head>\n<body>\n");
        html.push_str(&format!("<h1>{title}</h1>\n"));
        html.push_str(&format!(
            "<p class=\"generated\">Generated on {}. {} equations, {} regions, {} references.</p>\n",
            escape_html(model.generated_at()),
            stats.equations,
            stats.regions,
            stats.references
        ));

        let named: Vec<&str> = model
            .regions()
            .iter()
            .filter_map(|r| r.name.as_deref())
            .collect();
        if !named.is_empty() {
            html.push_str("<nav>\n<ul>\n");
            for name in named {
                html.push_str(&format!("<li>{}</li>\n", escape_html(name)));
            }
            html.push_str("</ul>\n</nav>\n");
        }

        for region in model.regions() {
            Self::render_region(&mut html, region);
        }
        html.push_str("</body>\n</html>\n");
        Ok(html)
    }
}

const STYLE: &str = "<style>
body { font-family: sans-serif; margin: 2em; }
.equation { border-top: 1px solid #ccc; padding: 0.5em 0; }
.legend { font-style: italic; }
.formula code { white-space: pre-wrap; }
a.main_variable { font-weight: bold; }
</style>
";

/// Pretty-printed JSON dump of the assembled model
pub struct JsonRenderer {
    title: String,
}

impl JsonRenderer {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    title: &'a str,
    #[serde(flatten)]
    model: &'a AssembledModel,
}

impl Renderer for JsonRenderer {
    fn render(&self, model: &AssembledModel) -> Result<String> {
        let document = JsonDocument {
            title: &self.title,
            model,
        };
        serde_json::to_string_pretty(&document).context("Failed to serialize model")
    }
}

fn link_list(names: &[String]) -> String {
    names
        .iter()
        .map(|name| {
            let name = escape_html(name);
            format!("<a href=\"#{name}\">{name}</a>")
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Escape equation text, keeping the anchors inserted by the linker
fn escape_outside_anchors(text: &str) -> String {
    segments(text)
        .into_iter()
        .map(|segment| match segment {
            Segment::Markup(tag) => tag.to_string(),
            Segment::Text(plain) => escape_html(plain),
        })
        .collect()
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use modeldoc_graph::{LinkBuilder, ModelAssembler};
    use modeldoc_parser::{parse_model, Grammar};
    use pretty_assertions::assert_eq;

    fn assembled(text: &str) -> AssembledModel {
        let model = parse_model(&Grammar::new(), text, "test.inp").unwrap();
        let linked = LinkBuilder::new().link(model);
        ModelAssembler::new(linked.graph).assemble(linked.model, "18/10/2026 - 09h15")
    }

    #[test]
    fn escape_keeps_anchor_markup() {
        assert_eq!(
            escape_outside_anchors(r##"<a href="#x">x</a> = a < b & "c""##),
            r##"<a href="#x">x</a> = a &lt; b &amp; &quot;c&quot;"##
        );
    }

    #[test]
    fn html_contains_sections_and_links() {
        let model = assembled(
            "ADDEQ TOP,\n--region Supply & Demand\ny: y = c + i,\nc: c = 0.8*y,\ni: i = 10;",
        );
        let html = HtmlRenderer::new("Test <model>").render(&model).unwrap();

        assert!(html.contains("<title>Test &lt;model&gt;</title>"));
        assert!(html.contains("Generated on 18/10/2026 - 09h15."));
        assert!(html.contains("<section class=\"region\" data-placement=\"top\">"));
        assert!(html.contains("<h2>Supply &amp; Demand</h2>"));
        assert!(html.contains("<div class=\"equation\" id=\"y\">"));
        assert!(html.contains(
            r##"<code><a href="#y" class="main_variable">y</a> = <a href="#c">c</a> + <a href="#i">i</a></code>"##
        ));
        assert!(html.contains(r##"Depends on: <a href="#c">c</a>, <a href="#i">i</a>"##));
        assert!(html.contains(r##"Appears in: <a href="#y">y</a>"##));
    }

    #[test]
    fn anonymous_region_gets_generic_heading() {
        let html = HtmlRenderer::new("t")
            .render(&assembled("ADDEQ, a: a = 1;"))
            .unwrap();
        assert!(html.contains("<section class=\"region\">\n<h2>Equations</h2>"));
        assert!(!html.contains("<nav>"));
    }

    #[test]
    fn json_carries_title_timestamp_and_stats() {
        let model = assembled("ADDEQ, x: x = y + 1.5, y: y = 2*x;");
        let json = JsonRenderer::new("Doc").render(&model).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["title"], "Doc");
        assert_eq!(value["generated_at"], "18/10/2026 - 09h15");
        assert_eq!(value["stats"]["equations"], 2);
        assert_eq!(value["stats"]["references"], 2);
        assert_eq!(value["regions"][0]["equations"][1]["appears_in"][0], "x");
    }
}
