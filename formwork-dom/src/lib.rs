use std::collections::HashMap;

pub mod value;
pub use value::Value;

/// One node of an attributed UI document tree: a tag, string attributes,
/// ordered children and optional text content.
///
/// The interpreter is allowed to annotate the tree it walks (synthetic
/// attributes and injected property nodes), so consumers hand it a mutable
/// tree rather than a shared one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub tag: String,
    pub attrs: HashMap<String, String>,
    pub children: Vec<Element>,
    pub text: Option<String>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: HashMap::new(),
            children: Vec::new(),
            text: None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(name.into(), value.into());
    }

    // Builder-style constructors, mostly for tests and synthesized nodes.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// First child with the given tag, in document order.
    pub fn find(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.tag == tag)
    }

    pub fn find_mut(&mut self, tag: &str) -> Option<&mut Element> {
        self.children.iter_mut().find(|c| c.tag == tag)
    }

    pub fn find_all<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// First descendant reachable along the given tag path, searching
    /// sibling branches in document order.
    pub fn find_path(&self, path: &[&str]) -> Option<&Element> {
        match path.split_first() {
            None => Some(self),
            Some((head, rest)) => self
                .children
                .iter()
                .filter(|c| c.tag == *head)
                .find_map(|c| c.find_path(rest)),
        }
    }

    /// Text content of the first element along `path`, if any.
    pub fn find_path_text(&self, path: &[&str]) -> Option<&str> {
        self.find_path(path).and_then(|e| e.text.as_deref())
    }

    /// Text content of the first child with the given tag.
    pub fn child_text(&self, tag: &str) -> Option<&str> {
        self.find(tag).and_then(|c| c.text.as_deref())
    }
}

/// Shorthand element constructor.
pub fn elem(tag: impl Into<String>) -> Element {
    Element::new(tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_tree() {
        let node = elem("widget")
            .with_attr("class", "QWidget")
            .with_child(elem("property").with_attr("name", "geometry"))
            .with_child(elem("widget").with_attr("class", "QLabel"));
        assert_eq!(node.tag, "widget");
        assert_eq!(node.attr("class"), Some("QWidget"));
        assert_eq!(node.children.len(), 2);
        assert!(node.find("property").is_some());
        assert_eq!(node.find_all("widget").count(), 1);
    }

    #[test]
    fn find_path_searches_sibling_branches() {
        let node = elem("spacer")
            .with_child(elem("property").with_attr("name", "orientation"))
            .with_child(
                elem("property").with_attr("name", "sizeHint").with_child(
                    elem("size")
                        .with_child(elem("width").with_text("40"))
                        .with_child(elem("height").with_text("20")),
                ),
            );
        // The first property has no size child; the search must move on.
        assert_eq!(node.find_path_text(&["property", "size", "width"]), Some("40"));
        assert_eq!(node.find_path_text(&["property", "size", "height"]), Some("20"));
        assert_eq!(node.find_path_text(&["property", "size", "depth"]), None);
    }

    #[test]
    fn child_text_reads_first_match() {
        let node = elem("connection")
            .with_child(elem("sender").with_text("okButton"))
            .with_child(elem("signal").with_text("clicked()"));
        assert_eq!(node.child_text("sender"), Some("okButton"));
        assert_eq!(node.child_text("receiver"), None);
    }
}
