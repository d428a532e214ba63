//! Script-tag templating for the entry page.

use serde::{Deserialize, Serialize};

use crate::environment::BundlingStrategy;
use crate::layout::ProjectLayout;

pub const SCRIPT_PLACEHOLDER: &str = "__SCRIPT__";

const DIMPORT_MODULE: &str = "https://unpkg.com/dimport@1.0.0/dist/index.mjs?module";
const DIMPORT_NOMODULE: &str = "https://unpkg.com/dimport/nomodule";

/// A single find-and-replace on the page template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtmlTemplatingRule {
    pub placeholder: String,
    pub markup: String,
}

impl HtmlTemplatingRule {
    /// Script markup for the given strategy.
    ///
    /// The bundle strategy loads `bundle.js` with a deferred script tag. The
    /// dynamic strategy loads `main.js` through a module loader, with a
    /// `nomodule` fallback for browsers without ES module support.
    pub fn for_strategy(strategy: BundlingStrategy, layout: &ProjectLayout) -> Self {
        let build_url = layout.build_url();
        let markup = match strategy {
            BundlingStrategy::Bundle => {
                format!("\n\t<script defer src=\"{build_url}/bundle.js\" ></script>\n\t")
            }
            BundlingStrategy::Dynamic => format!(
                "\n\t<script type=\"module\" defer src=\"{DIMPORT_MODULE}\" data-main=\"{build_url}/main.js\"></script>\
                 \n\t<script nomodule defer src=\"{DIMPORT_NOMODULE}\" data-main=\"{build_url}/main.js\"></script>\n\t"
            ),
        };

        Self {
            placeholder: SCRIPT_PLACEHOLDER.to_string(),
            markup,
        }
    }

    /// Replace the first placeholder occurrence. A template without the
    /// placeholder is returned unchanged.
    pub fn apply(&self, template: &str) -> String {
        template.replacen(&self.placeholder, &self.markup, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "<html><head>__SCRIPT__</head><body></body></html>";

    #[test]
    fn bundle_markup_points_at_single_script() {
        let rule = HtmlTemplatingRule::for_strategy(BundlingStrategy::Bundle, &ProjectLayout::new("."));
        let html = rule.apply(TEMPLATE);
        assert!(html.contains(r#"<script defer src="/build/bundle.js" ></script>"#));
        assert!(!html.contains(SCRIPT_PLACEHOLDER));
        assert!(!html.contains("type=\"module\""));
    }

    #[test]
    fn dynamic_markup_has_module_and_fallback() {
        let rule = HtmlTemplatingRule::for_strategy(BundlingStrategy::Dynamic, &ProjectLayout::new("."));
        let html = rule.apply(TEMPLATE);
        assert!(html.contains(r#"<script type="module" defer src="https://unpkg.com/dimport@1.0.0/dist/index.mjs?module" data-main="/build/main.js"></script>"#));
        assert!(html.contains(r#"<script nomodule defer src="https://unpkg.com/dimport/nomodule" data-main="/build/main.js"></script>"#));
        assert!(!html.contains("bundle.js"));
    }

    #[test]
    fn only_first_placeholder_is_replaced() {
        let rule = HtmlTemplatingRule::for_strategy(BundlingStrategy::Bundle, &ProjectLayout::new("."));
        let html = rule.apply("__SCRIPT__|__SCRIPT__");
        assert!(html.ends_with("|__SCRIPT__"));
        assert_eq!(html.matches("bundle.js").count(), 1);
    }

    #[test]
    fn template_without_placeholder_is_unchanged() {
        let rule = HtmlTemplatingRule::for_strategy(BundlingStrategy::Dynamic, &ProjectLayout::new("."));
        assert_eq!(rule.apply("<p>static</p>"), "<p>static</p>");
    }
}
