use formwork_dom::{Element, Value};

use crate::Result;
use crate::toolkit::Toolkit;

/// The classic single-value margin property, synthesized when all four
/// per-side margins are present and equal.
pub const MARGIN_PROP: &str = "margin";

/// Internal aggregate carrying (left, top, right, bottom) as four numbers;
/// -1 marks an unset side.
pub const CONTENTS_MARGINS_PROP: &str = "formworkContentsMargins";

/// Internal aggregate carrying (horizontal, vertical) spacing; -1 marks an
/// unset axis.
pub const SPACING_PROP: &str = "formworkSpacing";

/// A property application deferred until the full tree is built, because
/// the target's final state depends on children already being attached.
#[derive(Debug, Clone)]
pub struct DelayedProp<O> {
    pub target: O,
    /// Apply to the target's layout instead of the target itself.
    pub on_layout: bool,
    pub setter: String,
    pub value: Value,
}

/// Whether `elem` carries a `<property name="...">` child, without decoding.
pub fn has_property(elem: &Element, name: &str) -> bool {
    elem.children
        .iter()
        .any(|c| c.tag == "property" && c.attr("name") == Some(name))
}

/// Decodes property payloads and applies them to objects.
///
/// Resolvers also act as an accumulation side channel: applying properties
/// may record buddy links and delayed setters instead of applying them
/// eagerly; the interpreter drains both after the tree is complete.
pub trait PropertyResolver<T: Toolkit> {
    /// Decodes a single `<property>` node into a value, or `None` when the
    /// payload is unsupported.
    fn decode(&mut self, prop: &Element) -> Option<Value>;

    /// Decodes the named `<property>` child of `elem`.
    fn property(&mut self, elem: &Element, name: &str) -> Option<Value> {
        elem.children
            .iter()
            .find(|c| c.tag == "property" && c.attr("name") == Some(name))
            .and_then(|p| self.decode(p))
    }

    /// Decodes the named `<attribute>` child of `elem` (page titles, header
    /// settings, button groups and the like).
    fn attribute(&mut self, elem: &Element, name: &str) -> Option<Value> {
        elem.children
            .iter()
            .find(|c| c.tag == "attribute" && c.attr("name") == Some(name))
            .and_then(|p| self.decode(p))
    }

    /// Applies every `<property>` child of `elem` to `obj`.
    fn apply_properties(&mut self, toolkit: &mut T, obj: &T::Object, elem: &Element)
    -> Result<()>;

    /// The layout-default margin and spacing from the document preamble.
    fn set_defaults(&mut self, _margin: i64, _spacing: i64) {}

    /// The document's declared class name, used as translation context.
    fn set_context(&mut self, _name: &str) {}

    fn take_delayed(&mut self) -> Vec<DelayedProp<T::Object>> {
        Vec::new()
    }

    fn take_buddies(&mut self) -> Vec<(T::Object, String)> {
        Vec::new()
    }

    fn reset(&mut self) {}
}
