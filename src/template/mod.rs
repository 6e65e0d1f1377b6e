//! Rendering of segment models into display text.
//!
//! A bad template must never take the prompt down with it: [`render`] swaps any
//! failure for [`INCORRECT_TEMPLATE`] so the user sees something is off while
//! the rest of the line still renders.

use crate::utils::debug_with_context;
use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;
use thiserror::Error;

pub const INCORRECT_TEMPLATE: &str = "INCORRECT TEMPLATE";

#[derive(Debug, Error)]
#[error("template error: {0}")]
pub struct TemplateError(#[from] minijinja::Error);

fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    // Referencing a field the model does not expose is an error, not "".
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env
}

pub fn try_render<T: Serialize>(template: &str, data: &T) -> Result<String, TemplateError> {
    Ok(environment().render_str(template, data)?)
}

pub fn render<T: Serialize>(template: &str, data: &T) -> String {
    match try_render(template, data) {
        Ok(text) => text,
        Err(e) => {
            debug_with_context("template", &format!("{:?}: {}", template, e));
            INCORRECT_TEMPLATE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct Fields {
        branch: String,
        changed: bool,
    }

    fn fields() -> Fields {
        Fields {
            branch: "trunk".to_string(),
            changed: false,
        }
    }

    #[test]
    fn substitutes_fields() {
        assert_eq!(render("on {{ Branch }}", &fields()), "on trunk");
    }

    #[test]
    fn conditionals_see_booleans() {
        let out = render("{{ Branch }}{% if Changed %} dirty{% endif %}", &fields());
        assert_eq!(out, "trunk");
    }

    #[test]
    fn undefined_field_yields_sentinel() {
        assert_eq!(render("{{ Branch }} {{ Burp }}", &fields()), INCORRECT_TEMPLATE);
        assert!(try_render("{{ Burp }}", &fields()).is_err());
    }

    #[test]
    fn syntax_error_yields_sentinel() {
        assert_eq!(render("{{ Branch ", &fields()), INCORRECT_TEMPLATE);
    }
}
