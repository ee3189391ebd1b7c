//! A recording backend that materializes documents into a generic,
//! inspectable object graph.
//!
//! Every toolkit operation is stored on the node it targets, faithfully
//! enough that tests (and the CLI's dry-run inspector) can check placement
//! coordinates, item contents, wiring and deferred-pass effects without a
//! real widget toolkit in the loop.

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;

use formwork_dom::{Element, Value};
use log::debug;

use crate::props::{CONTENTS_MARGINS_PROP, DelayedProp, PropertyResolver, SPACING_PROP};
use crate::toolkit::{
    FormRole, GridPos, HeaderProp, HeaderSide, ItemAt, ItemField, LayoutChild, LayoutIndexProp,
    Toolkit,
};
use crate::{Error, Result};

/// Handle into the [`GraphToolkit`] node arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ObjectId(usize);

/// The slot kind a layout child occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacedKind {
    Widget,
    Layout,
    Spacer,
}

/// One child inserted into a layout, with its placement data.
#[derive(Clone, Debug)]
pub struct Placement {
    pub child: ObjectId,
    pub kind: PlacedKind,
    pub cell: Option<GridPos>,
    pub role: Option<FormRole>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ActionEntry {
    Action(ObjectId),
    Separator,
}

#[derive(Clone, Debug)]
pub struct ComboItem {
    pub icon: Option<Value>,
    pub text: Option<Value>,
}

#[derive(Clone, Debug)]
pub struct SpacerInfo {
    pub size: Option<(i32, i32)>,
    pub h_policy: Value,
    pub v_policy: Value,
}

/// One materialized object and everything recorded against it.
#[derive(Clone, Debug, Default)]
pub struct GraphNode {
    pub class: String,
    pub name: String,
    pub parent: Option<ObjectId>,
    pub children: Vec<ObjectId>,
    /// Whether the object was registered as a named attribute of the root.
    pub attribute: bool,
    pub properties: Vec<(String, Value)>,
    pub setter_calls: Vec<(String, Value)>,
    /// Layout children, when this node is a layout.
    pub placements: Vec<Placement>,
    pub index_props: Vec<(LayoutIndexProp, i32, i32)>,
    /// Pages adopted by tab/toolbox/wizard/stacked containers.
    pub pages: Vec<ObjectId>,
    pub page_icon: Option<Value>,
    pub page_title: Option<Value>,
    pub page_tooltip: Option<Value>,
    pub central_widget: Option<ObjectId>,
    pub menu_bar: Option<ObjectId>,
    pub status_bar: Option<ObjectId>,
    pub tool_bars: Vec<ObjectId>,
    pub dock_widgets: Vec<ObjectId>,
    pub toolbar_area: Option<Value>,
    pub toolbar_break: bool,
    pub dock_area: Option<Value>,
    /// Dock/scroll area content.
    pub area_widget: Option<ObjectId>,
    pub actions: Vec<ActionEntry>,
    pub menu_action: Option<ObjectId>,
    pub combo_items: Vec<ComboItem>,
    pub list_items: Vec<ObjectId>,
    pub table_items: Vec<(i32, i32, ObjectId)>,
    pub header_items: Vec<(HeaderSide, i32, ObjectId)>,
    pub header_props: Vec<(HeaderSide, HeaderProp, Value)>,
    /// Field applications, when this node is a data item.
    pub item_fields: Vec<(Option<i32>, ItemField, Value)>,
    pub column_count: Option<i32>,
    pub row_count: Option<i32>,
    pub sorting_enabled: bool,
    /// Every explicit sorting-flag flip, for auditing the deferral dance.
    pub sorting_sets: Vec<bool>,
    pub group_buttons: Vec<ObjectId>,
    pub buddy: Option<ObjectId>,
    pub spacer: Option<SpacerInfo>,
}

impl GraphNode {
    /// First recorded value of a named property.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

/// The arena of everything one or more builds created.
#[derive(Debug, Default)]
pub struct GraphToolkit {
    nodes: Vec<GraphNode>,
    tree_headers: HashMap<ObjectId, ObjectId>,
    custom_widgets: Vec<(String, String, String)>,
    connections: Vec<(ObjectId, String, ObjectId, String)>,
    slots_by_name: Vec<ObjectId>,
    tab_links: Vec<(ObjectId, ObjectId)>,
    finalized: Option<(ObjectId, Vec<String>)>,
}

impl GraphToolkit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: ObjectId) -> &GraphNode {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: ObjectId) -> &mut GraphNode {
        &mut self.nodes[id.0]
    }

    /// Looks an object up by name; later builds shadow earlier ones.
    pub fn find(&self, name: &str) -> Option<ObjectId> {
        self.nodes
            .iter()
            .rposition(|n| n.name == name)
            .map(ObjectId)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn connections(&self) -> &[(ObjectId, String, ObjectId, String)] {
        &self.connections
    }

    pub fn slots_connected_by_name(&self) -> &[ObjectId] {
        &self.slots_by_name
    }

    pub fn tab_links(&self) -> &[(ObjectId, ObjectId)] {
        &self.tab_links
    }

    pub fn custom_widgets(&self) -> &[(String, String, String)] {
        &self.custom_widgets
    }

    /// The lazily created header item of a tree widget, if any header
    /// columns were configured.
    pub fn tree_header(&self, tree: ObjectId) -> Option<ObjectId> {
        self.tree_headers.get(&tree).copied()
    }

    pub fn finalized(&self) -> Option<&(ObjectId, Vec<String>)> {
        self.finalized.as_ref()
    }

    fn alloc(
        &mut self,
        class: &str,
        name: &str,
        parent: Option<ObjectId>,
        attribute: bool,
    ) -> ObjectId {
        let id = ObjectId(self.nodes.len());
        self.nodes.push(GraphNode {
            class: class.to_string(),
            name: name.to_string(),
            parent,
            attribute,
            ..GraphNode::default()
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    /// Indented dump of the graph under `root`, placements first so layout
    /// order and coordinates are visible.
    pub fn render_tree(&self, root: ObjectId) -> String {
        let mut out = String::new();
        let mut printed = HashSet::new();
        self.render_into(root, 0, None, &mut printed, &mut out);
        out
    }

    fn render_into(
        &self,
        id: ObjectId,
        depth: usize,
        cell: Option<GridPos>,
        printed: &mut HashSet<ObjectId>,
        out: &mut String,
    ) {
        if !printed.insert(id) {
            return;
        }
        let node = self.node(id);
        let _ = write!(out, "{}{} {}", "  ".repeat(depth), node.class, node.name);
        if let Some(c) = cell {
            let _ = write!(
                out,
                " @ ({},{} {}x{})",
                c.row, c.column, c.row_span, c.col_span
            );
        }
        out.push('\n');
        for placement in &node.placements {
            self.render_into(placement.child, depth + 1, placement.cell, printed, out);
        }
        for child in &node.children {
            self.render_into(*child, depth + 1, None, printed, out);
        }
    }

    fn resolve_item(&self, owner: ObjectId, at: &ItemAt) -> Option<ObjectId> {
        let node = self.node(owner);
        match at {
            ItemAt::ListRow(row) => node.list_items.get(*row as usize).copied(),
            ItemAt::TableCell(row, column) => node
                .table_items
                .iter()
                .find(|(r, c, _)| r == row && c == column)
                .map(|(_, _, id)| *id),
            ItemAt::TreePath(path) => {
                let mut current = owner;
                for index in path {
                    current = *self.node(current).children.get(*index as usize)?;
                }
                Some(current)
            }
            ItemAt::TreeHeader => self.tree_headers.get(&owner).copied(),
            ItemAt::HorizontalHeader(index) => node
                .header_items
                .iter()
                .find(|(side, i, _)| *side == HeaderSide::Horizontal && i == index)
                .map(|(_, _, id)| *id),
            ItemAt::VerticalHeader(index) => node
                .header_items
                .iter()
                .find(|(side, i, _)| *side == HeaderSide::Vertical && i == index)
                .map(|(_, _, id)| *id),
        }
    }
}

impl Toolkit for GraphToolkit {
    type Object = ObjectId;

    fn create(
        &mut self,
        class: &str,
        name: &str,
        parent: Option<&ObjectId>,
        is_attribute: bool,
    ) -> Result<ObjectId> {
        debug!("create {class} {name}");
        Ok(self.alloc(class, name, parent.copied(), is_attribute))
    }

    fn create_spacer(
        &mut self,
        name: &str,
        size: Option<(i32, i32)>,
        h_policy: &Value,
        v_policy: &Value,
    ) -> Result<ObjectId> {
        let id = self.alloc("QSpacerItem", name, None, false);
        self.node_mut(id).spacer = Some(SpacerInfo {
            size,
            h_policy: h_policy.clone(),
            v_policy: v_policy.clone(),
        });
        Ok(id)
    }

    fn register_custom_widget(&mut self, class: &str, extends: &str, module: &str) -> Result<()> {
        self.custom_widgets
            .push((class.to_string(), extends.to_string(), module.to_string()));
        Ok(())
    }

    fn set_property(&mut self, obj: &ObjectId, name: &str, value: &Value) -> Result<()> {
        if name == "sortingEnabled" {
            if let Some(enabled) = value.as_bool() {
                self.node_mut(*obj).sorting_enabled = enabled;
            }
        }
        self.node_mut(*obj)
            .properties
            .push((name.to_string(), value.clone()));
        Ok(())
    }

    fn call_setter(&mut self, obj: &ObjectId, setter: &str, value: &Value) -> Result<()> {
        self.node_mut(*obj)
            .setter_calls
            .push((setter.to_string(), value.clone()));
        Ok(())
    }

    fn layout_of(&mut self, widget: &ObjectId) -> Result<ObjectId> {
        self.node(*widget)
            .children
            .iter()
            .copied()
            .find(|c| self.node(*c).class.ends_with("Layout"))
            .ok_or_else(|| Error::Toolkit(format!("{} has no layout", self.node(*widget).name)))
    }

    fn place_in_layout(
        &mut self,
        layout: &ObjectId,
        child: LayoutChild<'_, ObjectId>,
        cell: Option<GridPos>,
        role: Option<FormRole>,
    ) -> Result<()> {
        let (kind, id) = match child {
            LayoutChild::Widget(o) => (PlacedKind::Widget, *o),
            LayoutChild::Layout(o) => (PlacedKind::Layout, *o),
            LayoutChild::Spacer(o) => (PlacedKind::Spacer, *o),
        };
        self.node_mut(*layout).placements.push(Placement {
            child: id,
            kind,
            cell,
            role,
        });
        Ok(())
    }

    fn set_layout_index_prop(
        &mut self,
        layout: &ObjectId,
        prop: LayoutIndexProp,
        index: i32,
        value: i32,
    ) -> Result<()> {
        self.node_mut(*layout).index_props.push((prop, index, value));
        Ok(())
    }

    fn add_toolbox_page(
        &mut self,
        toolbox: &ObjectId,
        page: &ObjectId,
        icon: Option<Value>,
        label: Option<Value>,
        tooltip: Option<Value>,
    ) -> Result<()> {
        self.node_mut(*toolbox).pages.push(*page);
        let page = self.node_mut(*page);
        page.page_icon = icon;
        page.page_title = label;
        page.page_tooltip = tooltip;
        Ok(())
    }

    fn add_tab_page(
        &mut self,
        tabs: &ObjectId,
        page: &ObjectId,
        icon: Option<Value>,
        title: Option<Value>,
        tooltip: Option<Value>,
    ) -> Result<()> {
        self.node_mut(*tabs).pages.push(*page);
        let page = self.node_mut(*page);
        page.page_icon = icon;
        page.page_title = title;
        page.page_tooltip = tooltip;
        Ok(())
    }

    fn add_wizard_page(&mut self, wizard: &ObjectId, page: &ObjectId) -> Result<()> {
        self.node_mut(*wizard).pages.push(*page);
        Ok(())
    }

    fn add_stacked_page(&mut self, stack: &ObjectId, page: &ObjectId) -> Result<()> {
        self.node_mut(*stack).pages.push(*page);
        Ok(())
    }

    fn set_area_widget(&mut self, area: &ObjectId, child: &ObjectId) -> Result<()> {
        self.node_mut(*area).area_widget = Some(*child);
        Ok(())
    }

    fn set_central_widget(&mut self, window: &ObjectId, widget: &ObjectId) -> Result<()> {
        self.node_mut(*window).central_widget = Some(*widget);
        Ok(())
    }

    fn add_tool_bar(
        &mut self,
        window: &ObjectId,
        bar: &ObjectId,
        area: Option<Value>,
        break_before: bool,
    ) -> Result<()> {
        self.node_mut(*window).tool_bars.push(*bar);
        let bar = self.node_mut(*bar);
        bar.toolbar_area = area;
        bar.toolbar_break = break_before;
        Ok(())
    }

    fn set_menu_bar(&mut self, window: &ObjectId, bar: &ObjectId) -> Result<()> {
        self.node_mut(*window).menu_bar = Some(*bar);
        Ok(())
    }

    fn set_status_bar(&mut self, window: &ObjectId, bar: &ObjectId) -> Result<()> {
        self.node_mut(*window).status_bar = Some(*bar);
        Ok(())
    }

    fn add_dock_widget(
        &mut self,
        window: &ObjectId,
        dock: &ObjectId,
        area: Option<Value>,
    ) -> Result<()> {
        self.node_mut(*window).dock_widgets.push(*dock);
        self.node_mut(*dock).dock_area = area;
        Ok(())
    }

    fn add_action(&mut self, owner: &ObjectId, action: &ObjectId) -> Result<()> {
        self.node_mut(*owner).actions.push(ActionEntry::Action(*action));
        Ok(())
    }

    fn add_separator(&mut self, owner: &ObjectId) -> Result<()> {
        self.node_mut(*owner).actions.push(ActionEntry::Separator);
        Ok(())
    }

    fn menu_action(&mut self, menu: &ObjectId) -> Result<ObjectId> {
        if let Some(existing) = self.node(*menu).menu_action {
            return Ok(existing);
        }
        let name = format!("{}MenuAction", self.node(*menu).name);
        let action = self.alloc("QAction", &name, Some(*menu), false);
        self.node_mut(*menu).menu_action = Some(action);
        Ok(action)
    }

    fn combo_add_item(&mut self, combo: &ObjectId, icon: Option<Value>) -> Result<()> {
        self.node_mut(*combo)
            .combo_items
            .push(ComboItem { icon, text: None });
        Ok(())
    }

    fn combo_set_item_text(
        &mut self,
        combo: &ObjectId,
        index: i32,
        text: Option<Value>,
    ) -> Result<()> {
        // Out-of-range indices are ignored, like the real control.
        if let Some(item) = self
            .node_mut(*combo)
            .combo_items
            .get_mut(index as usize)
        {
            item.text = text;
        }
        Ok(())
    }

    fn list_add_item(&mut self, list: &ObjectId, item: &ObjectId) -> Result<()> {
        self.node_mut(*list).list_items.push(*item);
        Ok(())
    }

    fn table_set_item(
        &mut self,
        table: &ObjectId,
        row: i32,
        column: i32,
        item: &ObjectId,
    ) -> Result<()> {
        self.node_mut(*table).table_items.push((row, column, *item));
        Ok(())
    }

    fn item_handle(&mut self, owner: &ObjectId, at: ItemAt) -> Result<Option<ObjectId>> {
        if at == ItemAt::TreeHeader && !self.tree_headers.contains_key(owner) {
            let header = self.alloc("QTreeWidgetItem", "headerItem", None, false);
            self.tree_headers.insert(*owner, header);
        }
        Ok(self.resolve_item(*owner, &at))
    }

    fn set_item_field(
        &mut self,
        item: &ObjectId,
        column: Option<i32>,
        field: ItemField,
        value: &Value,
    ) -> Result<()> {
        self.node_mut(*item)
            .item_fields
            .push((column, field, value.clone()));
        Ok(())
    }

    fn set_header_item(
        &mut self,
        view: &ObjectId,
        side: HeaderSide,
        index: i32,
        item: &ObjectId,
    ) -> Result<()> {
        self.node_mut(*view).header_items.push((side, index, *item));
        Ok(())
    }

    fn set_header_prop(
        &mut self,
        view: &ObjectId,
        side: HeaderSide,
        prop: HeaderProp,
        value: &Value,
    ) -> Result<()> {
        self.node_mut(*view)
            .header_props
            .push((side, prop, value.clone()));
        Ok(())
    }

    fn set_column_count(&mut self, view: &ObjectId, count: i32) -> Result<()> {
        self.node_mut(*view).column_count = Some(count);
        Ok(())
    }

    fn set_row_count(&mut self, view: &ObjectId, count: i32) -> Result<()> {
        self.node_mut(*view).row_count = Some(count);
        Ok(())
    }

    fn is_sorting_enabled(&mut self, view: &ObjectId) -> Result<bool> {
        Ok(self.node(*view).sorting_enabled)
    }

    fn set_sorting_enabled(&mut self, view: &ObjectId, enabled: bool) -> Result<()> {
        let node = self.node_mut(*view);
        node.sorting_enabled = enabled;
        node.sorting_sets.push(enabled);
        Ok(())
    }

    fn add_to_button_group(&mut self, group: &ObjectId, button: &ObjectId) -> Result<()> {
        self.node_mut(*group).group_buttons.push(*button);
        Ok(())
    }

    fn set_buddy(&mut self, label: &ObjectId, buddy: &ObjectId) -> Result<()> {
        self.node_mut(*label).buddy = Some(*buddy);
        Ok(())
    }

    fn set_tab_order(&mut self, first: &ObjectId, second: &ObjectId) -> Result<()> {
        self.tab_links.push((*first, *second));
        Ok(())
    }

    fn connect(
        &mut self,
        sender: &ObjectId,
        signal: &str,
        receiver: &ObjectId,
        slot: &str,
    ) -> Result<()> {
        self.connections
            .push((*sender, signal.to_string(), *receiver, slot.to_string()));
        Ok(())
    }

    fn connect_slots_by_name(&mut self, root: &ObjectId) -> Result<()> {
        self.slots_by_name.push(*root);
        Ok(())
    }

    fn finalize(&mut self, root: &ObjectId, resources: &[String]) -> Result<()> {
        self.finalized = Some((*root, resources.to_vec()));
        Ok(())
    }
}

/// Decodes the common document property payloads and routes the deferred
/// kinds (buddies, selection indices) into the accumulation side channels.
#[derive(Debug, Default)]
pub struct GraphResolver {
    delayed: Vec<DelayedProp<ObjectId>>,
    buddies: Vec<(ObjectId, String)>,
    context: String,
    default_margin: i64,
    default_spacing: i64,
}

impl GraphResolver {
    pub fn new() -> Self {
        Self {
            default_margin: 0,
            default_spacing: 6,
            ..Self::default()
        }
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn defaults(&self) -> (i64, i64) {
        (self.default_margin, self.default_spacing)
    }
}

impl PropertyResolver<GraphToolkit> for GraphResolver {
    fn decode(&mut self, prop: &Element) -> Option<Value> {
        prop.children.first().and_then(decode_payload)
    }

    fn apply_properties(
        &mut self,
        toolkit: &mut GraphToolkit,
        obj: &ObjectId,
        elem: &Element,
    ) -> Result<()> {
        for prop in elem.children.iter().filter(|c| c.tag == "property") {
            let Some(name) = prop.attr("name") else {
                continue;
            };
            match name {
                // Buddy links can only be resolved once every widget exists.
                "buddy" => {
                    if let Some(value) = self.decode(prop) {
                        if let Some(buddy) = value.as_str() {
                            self.buddies.push((*obj, buddy.to_string()));
                        }
                    }
                }
                // Selections refer to children that are not inserted yet.
                "currentIndex" | "currentRow" => {
                    if let Some(value) = self.decode(prop) {
                        let setter = if name == "currentIndex" {
                            "setCurrentIndex"
                        } else {
                            "setCurrentRow"
                        };
                        self.delayed.push(DelayedProp {
                            target: *obj,
                            on_layout: false,
                            setter: setter.to_string(),
                            value,
                        });
                    }
                }
                n if n == CONTENTS_MARGINS_PROP => {
                    let sides: Vec<Value> = prop
                        .children
                        .iter()
                        .filter(|c| c.tag == "number")
                        .filter_map(decode_payload)
                        .collect();
                    toolkit.set_property(obj, "contentsMargins", &Value::List(sides))?;
                }
                n if n == SPACING_PROP => {
                    let axes: Vec<i64> = prop
                        .children
                        .iter()
                        .filter(|c| c.tag == "number")
                        .filter_map(|c| decode_payload(c).and_then(|v| v.as_int()))
                        .collect();
                    if let [horizontal, vertical] = axes[..] {
                        if horizontal >= 0 {
                            toolkit.set_property(obj, "horizontalSpacing", &Value::Int(horizontal))?;
                        }
                        if vertical >= 0 {
                            toolkit.set_property(obj, "verticalSpacing", &Value::Int(vertical))?;
                        }
                    }
                }
                _ => match self.decode(prop) {
                    Some(value) => toolkit.set_property(obj, name, &value)?,
                    None => debug!("property {name} has an unsupported payload, skipped"),
                },
            }
        }
        Ok(())
    }

    fn set_defaults(&mut self, margin: i64, spacing: i64) {
        self.default_margin = margin;
        self.default_spacing = spacing;
    }

    fn set_context(&mut self, name: &str) {
        self.context = name.to_string();
    }

    fn take_delayed(&mut self) -> Vec<DelayedProp<ObjectId>> {
        std::mem::take(&mut self.delayed)
    }

    fn take_buddies(&mut self) -> Vec<(ObjectId, String)> {
        std::mem::take(&mut self.buddies)
    }

    fn reset(&mut self) {
        self.delayed.clear();
        self.buddies.clear();
        self.context.clear();
        self.default_margin = 0;
        self.default_spacing = 6;
    }
}

fn decode_payload(payload: &Element) -> Option<Value> {
    let text = payload.text.as_deref().unwrap_or("");
    match payload.tag.as_str() {
        "string" => {
            let s = text.to_string();
            if payload.attr("notr").is_some_and(|v| v == "true") {
                Some(Value::Str(s))
            } else {
                Some(Value::Tr(s))
            }
        }
        "cstring" => Some(Value::Str(text.to_string())),
        "number" => text.trim().parse().ok().map(Value::Int),
        "double" => text.trim().parse().ok().map(Value::Double),
        "bool" => match text.trim() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        "enum" => Some(Value::Enum(text.to_string())),
        "set" => Some(Value::Set(text.to_string())),
        "size" => {
            let width = payload.child_text("width")?.trim().parse().ok()?;
            let height = payload.child_text("height")?.trim().parse().ok()?;
            Some(Value::Size(width, height))
        }
        "iconset" => {
            let path = if text.is_empty() {
                payload
                    .children
                    .first()
                    .and_then(|c| c.text.as_deref())
                    .unwrap_or("")
            } else {
                text
            };
            Some(Value::Icon(path.to_string()))
        }
        "stringlist" => Some(Value::List(
            payload
                .find_all("string")
                .map(|s| Value::Tr(s.text.clone().unwrap_or_default()))
                .collect(),
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_dom::elem;

    #[test]
    fn decode_scalars() {
        let string = elem("property")
            .with_attr("name", "text")
            .with_child(elem("string").with_text("Hello"));
        let mut resolver = GraphResolver::new();
        assert_eq!(resolver.decode(&string), Some(Value::Tr("Hello".into())));

        let notr = elem("property")
            .with_attr("name", "text")
            .with_child(elem("string").with_attr("notr", "true").with_text("raw"));
        assert_eq!(resolver.decode(&notr), Some(Value::Str("raw".into())));

        let number = elem("property")
            .with_attr("name", "currentIndex")
            .with_child(elem("number").with_text("3"));
        assert_eq!(resolver.decode(&number), Some(Value::Int(3)));

        let size = elem("property").with_attr("name", "sizeHint").with_child(
            elem("size")
                .with_child(elem("width").with_text("40"))
                .with_child(elem("height").with_text("20")),
        );
        assert_eq!(resolver.decode(&size), Some(Value::Size(40, 20)));

        let unknown = elem("property")
            .with_attr("name", "font")
            .with_child(elem("font"));
        assert_eq!(resolver.decode(&unknown), None);
    }

    #[test]
    fn graph_records_creation_and_parents() {
        let mut tk = GraphToolkit::new();
        let root = tk.create("QWidget", "form", None, false).expect("create");
        let child = tk
            .create("QPushButton", "ok", Some(&root), true)
            .expect("create");
        assert_eq!(tk.node(child).parent, Some(root));
        assert_eq!(tk.node(root).children, vec![child]);
        assert_eq!(tk.find("ok"), Some(child));
        assert!(tk.node(child).attribute);
    }

    #[test]
    fn tree_paths_resolve_through_children() {
        let mut tk = GraphToolkit::new();
        let tree = tk.create("QTreeWidget", "tree", None, true).expect("create");
        let top = tk
            .create("QTreeWidgetItem", "item_0", Some(&tree), false)
            .expect("create");
        let nested = tk
            .create("QTreeWidgetItem", "item_1", Some(&top), false)
            .expect("create");
        assert_eq!(
            tk.item_handle(&tree, ItemAt::TreePath(vec![0])).expect("fetch"),
            Some(top)
        );
        assert_eq!(
            tk.item_handle(&tree, ItemAt::TreePath(vec![0, 0])).expect("fetch"),
            Some(nested)
        );
        assert_eq!(
            tk.item_handle(&tree, ItemAt::TreePath(vec![1])).expect("fetch"),
            None
        );
    }
}
