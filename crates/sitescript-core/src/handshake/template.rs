/// A canned script the editor can load in place of the current text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    /// Short identifier for command lines and menus.
    pub slug: &'static str,
    /// Human-readable menu title.
    pub name: &'static str,
    pub source: &'static str,
}

pub const PRINT_PAGE_TITLE: Template = Template {
    slug: "page-title",
    name: "Print page title",
    source: "alert(document.title);",
};

pub const TEMPLATES: &[Template] = &[PRINT_PAGE_TITLE];

/// Look up a template by slug or (case-insensitive) name.
pub fn find_template(name: &str) -> Option<&'static Template> {
    TEMPLATES
        .iter()
        .find(|t| t.slug == name || t.name.eq_ignore_ascii_case(name))
}
