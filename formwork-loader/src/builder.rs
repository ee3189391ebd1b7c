use std::collections::HashMap;
use std::mem;

use formwork_dom::{Element, Value};
use log::debug;

use crate::class::{ClassMap, LayoutKind, ObjectKind, WidgetKind};
use crate::props::{
    CONTENTS_MARGINS_PROP, MARGIN_PROP, PropertyResolver, SPACING_PROP, has_property,
};
use crate::stack::{Placed, PlacementStack};
use crate::toolkit::{
    FormRole, GridPos, HeaderProp, HeaderSide, ItemAt, ItemField, LayoutChild, LayoutIndexProp,
    Toolkit,
};
use crate::{Error, Result};

const SUPPORTED_VERSION: &str = "4.0";

/// Scratch attribute carrying a decoded grid position from an `<item>`
/// wrapper down to the widget/layout/spacer it wraps.
const SCRATCH_GRID_POS: &str = "grid-position";

/// The product of one document build.
#[derive(Debug, Clone)]
pub struct Built<O> {
    pub root: O,
    /// Module names inferred from the document's resource includes, for the
    /// caller to link or import.
    pub resources: Vec<String>,
}

/// Traversal state scoped to the data widget currently being populated.
#[derive(Debug)]
struct ItemState<O> {
    item_nr: i32,
    column_counter: i32,
    row_counter: i32,
    /// Nesting path while building tree items, with each item's sibling
    /// index in its immediate parent.
    item_stack: Vec<(O, i32)>,
    /// Sorting flag captured before the first insertion, restored once the
    /// widget is complete.
    sorting_was: Option<bool>,
}

impl<O> Default for ItemState<O> {
    fn default() -> Self {
        Self {
            item_nr: 0,
            column_counter: 0,
            row_counter: 0,
            item_stack: Vec::new(),
            sorting_was: None,
        }
    }
}

/// Interprets one parsed UI document at a time into objects created through
/// a [`Toolkit`].
///
/// All per-document state is reset at the start and end of [`Builder::build`],
/// so one instance can be reused for several documents in sequence. Custom
/// widget registrations persist across builds, like the factory they were
/// registered with.
pub struct Builder<T: Toolkit, R> {
    toolkit: T,
    resolver: R,
    classes: ClassMap,
    stack: PlacementStack<T::Object>,
    toplevel: Option<T::Object>,
    context_name: String,
    name_suffixes: HashMap<String, u32>,
    default_margin: i64,
    default_spacing: i64,
    actions: Vec<(T::Object, String)>,
    current_action_group: Option<T::Object>,
    resources: Vec<String>,
    button_groups: Vec<(String, T::Object)>,
    /// Named attributes of the top-level object, for reference resolution.
    registry: HashMap<String, (T::Object, ObjectKind)>,
    /// Set while the construction sits inside a generic wrapper widget that
    /// exists only to host a layout.
    layout_widget: bool,
    items: ItemState<T::Object>,
}

impl<T: Toolkit, R: PropertyResolver<T>> Builder<T, R> {
    pub fn new(toolkit: T, resolver: R) -> Self {
        Self {
            toolkit,
            resolver,
            classes: ClassMap::new(),
            stack: PlacementStack::new(),
            toplevel: None,
            context_name: String::new(),
            name_suffixes: HashMap::new(),
            default_margin: 0,
            default_spacing: 6,
            actions: Vec::new(),
            current_action_group: None,
            resources: Vec::new(),
            button_groups: Vec::new(),
            registry: HashMap::new(),
            layout_widget: false,
            items: ItemState::default(),
        }
    }

    pub fn toolkit(&self) -> &T {
        &self.toolkit
    }

    pub fn toolkit_mut(&mut self) -> &mut T {
        &mut self.toolkit
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn into_toolkit(self) -> T {
        self.toolkit
    }

    /// Interprets a document whose root is the `<ui>` element.
    ///
    /// Sections are processed in dependency order: the widget tree needs
    /// all custom widgets registered first, and connections, tab stops and
    /// deferred passes need every named object to exist.
    pub fn build(&mut self, doc: &mut Element) -> Result<Built<T::Object>> {
        self.reset_state();

        let version = doc.attr("version").unwrap_or_default();
        if version != SUPPORTED_VERSION {
            return Err(Error::UnsupportedVersion(version.to_string()));
        }

        if let Some(defaults) = doc.find("layoutdefault") {
            self.read_defaults(defaults);
        }
        if let Some(class) = doc.find("class") {
            let name = class.text.clone().unwrap_or_default();
            debug!("document class is {name:?}");
            self.context_name = name.clone();
            self.resolver.set_context(&name);
        }
        if let Some(custom) = doc.find("customwidgets") {
            self.register_custom_widgets(custom)?;
        }
        if let Some(widget) = doc.find_mut("widget") {
            self.create_user_interface(widget)?;
        }
        if let Some(connections) = doc.find("connections") {
            self.create_connections(connections)?;
        }
        if let Some(tabstops) = doc.find("tabstops") {
            self.apply_tab_order(tabstops)?;
        }
        if let Some(resources) = doc.find("resources") {
            collect_resource_modules(resources, &mut self.resources);
        }

        let root = self
            .toplevel
            .clone()
            .ok_or_else(|| Error::Document("document has no widget element".into()))?;
        self.toolkit.finalize(&root, &self.resources)?;
        let resources = mem::take(&mut self.resources);
        self.reset_state();
        Ok(Built { root, resources })
    }

    fn reset_state(&mut self) {
        self.resolver.reset();
        self.stack.clear();
        self.toplevel = None;
        self.context_name.clear();
        self.name_suffixes.clear();
        self.default_margin = 0;
        self.default_spacing = 6;
        self.actions.clear();
        self.current_action_group = None;
        self.resources.clear();
        self.button_groups.clear();
        self.registry.clear();
        self.layout_widget = false;
        self.items = ItemState::default();
    }

    /// Returns `base` unchanged on first use, then `base1`, `base2`, …
    fn unique_name(&mut self, base: &str) -> String {
        match self.name_suffixes.get_mut(base) {
            Some(suffix) => {
                *suffix += 1;
                format!("{base}{suffix}")
            }
            None => {
                self.name_suffixes.insert(base.to_string(), 0);
                base.to_string()
            }
        }
    }

    fn setup_object(
        &mut self,
        class: &str,
        parent: Option<&T::Object>,
        elem: &Element,
        is_attribute: bool,
    ) -> Result<T::Object> {
        let base = match elem.attr("name") {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => default_object_name(class),
        };
        let name = self.unique_name(&base);
        let obj = self.toolkit.create(class, &name, parent, is_attribute)?;
        self.resolver
            .apply_properties(&mut self.toolkit, &obj, elem)?;
        if is_attribute {
            self.registry
                .insert(name, (obj.clone(), self.classes.object_kind(class)));
        }
        Ok(obj)
    }

    fn traverse(&mut self, elem: &mut Element) -> Result<()> {
        for i in 0..elem.children.len() {
            let tag = elem.children[i].tag.clone();
            match tag.as_str() {
                "widget" => self.create_widget(&mut elem.children[i])?,
                "addaction" => self.record_action_ref(&elem.children[i]),
                "layout" => self.create_layout(&mut elem.children[i])?,
                "spacer" => self.create_spacer(&elem.children[i])?,
                "item" => self.handle_item(&mut elem.children[i])?,
                "action" => self.create_action(&elem.children[i])?,
                "actiongroup" => self.create_action_group(&mut elem.children[i])?,
                "column" | "row" => self.add_header(&elem.children[i])?,
                // Unknown tags are skipped so newer documents stay loadable.
                _ => {}
            }
        }
        Ok(())
    }

    fn create_widget(&mut self, elem: &mut Element) -> Result<()> {
        let saved_items = mem::take(&mut self.items);

        let Some(raw_class) = elem.attr("class") else {
            return Err(Error::Document("widget element without class attribute".into()));
        };
        let mut class = raw_class.replace("::", ".");
        if class == "Line" {
            class = "QFrame".to_string();
        }
        let kind = self.classes.widget_kind(&class);

        // Containers that adopt pages through their own API do not act as a
        // constructor parent.
        let parent = match self.stack.top_widget() {
            Some(top) if top.kind.widget().is_some_and(WidgetKind::adopts_by_api) => None,
            Some(top) => Some(top.object.clone()),
            None => None,
        };

        // A bare QWidget with a real, non-main-window parent only exists to
        // host a layout; that layout must end up without a margin.
        if class == "QWidget"
            && parent.is_some()
            && self.stack.top_widget().map(|top| top.kind)
                != Some(ObjectKind::Widget(WidgetKind::MainWindow))
        {
            self.layout_widget = true;
        }

        let widget = self.setup_object(&class, parent.as_ref(), elem, true)?;
        self.stack.push(Placed {
            object: widget.clone(),
            kind: ObjectKind::Widget(kind),
            class: class.clone(),
        });

        // Tables declare their shape implicitly through column/row nodes
        // unless the counts are set as explicit properties.
        if kind == WidgetKind::TableWidget {
            if !has_property(elem, "columnCount") {
                let columns = elem.find_all("column").count() as i32;
                self.toolkit.set_column_count(&widget, columns)?;
            }
            if !has_property(elem, "rowCount") {
                let rows = elem.find_all("row").count() as i32;
                self.toolkit.set_row_count(&widget, rows)?;
            }
        }

        self.traverse(elem)?;
        let finished = self
            .stack
            .pop_widget()
            .ok_or_else(|| Error::Document("unbalanced placement stack".into()))?;
        self.layout_widget = false;

        if kind.is_tree_view() {
            self.apply_header_attributes(elem, "header", &finished.object, HeaderSide::Tree)?;
        } else if kind.is_table_view() {
            self.apply_header_attributes(
                elem,
                "horizontalHeader",
                &finished.object,
                HeaderSide::Horizontal,
            )?;
            self.apply_header_attributes(
                elem,
                "verticalHeader",
                &finished.object,
                HeaderSide::Vertical,
            )?;
        } else if kind == WidgetKind::Button {
            self.assign_button_group(elem, &finished.object)?;
        }

        if let Some(was_enabled) = self.items.sorting_was.take() {
            self.toolkit.set_sorting_enabled(&finished.object, was_enabled)?;
        }

        if let Some(parent_layout) = self.stack.peek().filter(|p| p.kind.is_layout()) {
            let layout = parent_layout.object.clone();
            let layout_kind = parent_layout.kind;
            let cell = read_scratch(elem);
            let role = form_role_for(layout_kind, cell);
            self.toolkit
                .place_in_layout(&layout, LayoutChild::Widget(&finished.object), cell, role)?;
        }

        self.adopt_into_container(elem, &finished, kind)?;

        self.items = saved_items;
        Ok(())
    }

    /// Post-build adoption of a finished widget by an enclosing container
    /// that uses a dedicated add/set call instead of constructor parentage.
    fn adopt_into_container(
        &mut self,
        elem: &Element,
        finished: &Placed<T::Object>,
        kind: WidgetKind,
    ) -> Result<()> {
        let Some(top) = self.stack.top_widget() else {
            return Ok(());
        };
        let container = top.object.clone();
        let Some(container_kind) = top.kind.widget() else {
            return Ok(());
        };

        match container_kind {
            WidgetKind::ToolBox => {
                let icon = self.resolver.attribute(elem, "icon");
                let label = self.resolver.attribute(elem, "label");
                let tooltip = self.resolver.attribute(elem, "toolTip");
                self.toolkit
                    .add_toolbox_page(&container, &finished.object, icon, label, tooltip)?;
            }
            WidgetKind::TabWidget => {
                let icon = self.resolver.attribute(elem, "icon");
                let title = self.resolver.attribute(elem, "title");
                let tooltip = self.resolver.attribute(elem, "toolTip");
                self.toolkit
                    .add_tab_page(&container, &finished.object, icon, title, tooltip)?;
            }
            WidgetKind::Wizard => self.toolkit.add_wizard_page(&container, &finished.object)?,
            WidgetKind::StackedWidget => {
                self.toolkit.add_stacked_page(&container, &finished.object)?
            }
            WidgetKind::DockWidget | WidgetKind::ScrollArea => {
                self.toolkit.set_area_widget(&container, &finished.object)?
            }
            WidgetKind::MainWindow => {
                // Only the exact generic widget class becomes the central
                // widget; subclasses fall through to their own roles.
                if finished.class == "QWidget" {
                    self.toolkit.set_central_widget(&container, &finished.object)?;
                } else {
                    match kind {
                        WidgetKind::ToolBar => {
                            let area = self.resolver.attribute(elem, "toolBarArea");
                            let add_break = self
                                .resolver
                                .attribute(elem, "toolBarBreak")
                                .is_some_and(|v| v.is_truthy());
                            self.toolkit
                                .add_tool_bar(&container, &finished.object, area, add_break)?;
                        }
                        WidgetKind::MenuBar => {
                            self.toolkit.set_menu_bar(&container, &finished.object)?
                        }
                        WidgetKind::StatusBar => {
                            self.toolkit.set_status_bar(&container, &finished.object)?
                        }
                        WidgetKind::DockWidget => {
                            let area = self.resolver.attribute(elem, "dockWidgetArea");
                            self.toolkit
                                .add_dock_widget(&container, &finished.object, area)?;
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn apply_header_attributes(
        &mut self,
        elem: &Element,
        prefix: &str,
        view: &T::Object,
        side: HeaderSide,
    ) -> Result<()> {
        for prop in HeaderProp::ALL {
            let name = format!("{prefix}{}", prop.attribute_suffix());
            if let Some(value) = self.resolver.attribute(elem, &name) {
                self.toolkit.set_header_prop(view, side, prop, &value)?;
            }
        }
        Ok(())
    }

    fn assign_button_group(&mut self, elem: &Element, button: &T::Object) -> Result<()> {
        let Some(value) = self.resolver.attribute(elem, "buttonGroup") else {
            return Ok(());
        };
        let Some(group_name) = value.as_str().map(str::to_string) else {
            return Ok(());
        };
        let group = match self
            .button_groups
            .iter()
            .find(|(name, _)| *name == group_name)
        {
            Some((_, group)) => group.clone(),
            None => {
                let toplevel = self
                    .toplevel
                    .clone()
                    .ok_or_else(|| Error::Document("button group outside a widget tree".into()))?;
                let group = self
                    .toolkit
                    .create("QButtonGroup", &group_name, Some(&toplevel), true)?;
                self.registry.insert(
                    group_name.clone(),
                    (group.clone(), self.classes.object_kind("QButtonGroup")),
                );
                self.button_groups.push((group_name, group.clone()));
                group
            }
        };
        self.toolkit.add_to_button_group(&group, button)
    }

    fn create_layout(&mut self, elem: &mut Element) -> Result<()> {
        self.normalize_margins(elem);
        self.normalize_spacing(elem);

        let Some(class) = elem.attr("class").map(str::to_string) else {
            return Err(Error::Document("layout element without class attribute".into()));
        };
        let kind = self.classes.layout_kind(&class);

        // A layout nested in a layout has no widget parent of its own.
        let parent = if self.stack.top_is_layout() {
            None
        } else {
            self.stack.top_widget().map(|top| top.object.clone())
        };
        if elem.attr("name").is_none() {
            elem.set_attr("name", default_object_name(&class));
        }

        let layout = self.setup_object(&class, parent.as_ref(), elem, true)?;
        self.stack.push(Placed {
            object: layout,
            kind: ObjectKind::Layout(kind),
            class,
        });
        self.traverse(elem)?;
        let finished = self
            .stack
            .pop_layout()
            .ok_or_else(|| Error::Document("unbalanced placement stack".into()))?;

        self.configure_layout(elem, &finished.object, kind)?;

        if let Some(parent_layout) = self.stack.peek().filter(|p| p.kind.is_layout()) {
            let outer = parent_layout.object.clone();
            let outer_kind = parent_layout.kind;
            let cell = read_scratch(elem);
            let role = form_role_for(outer_kind, cell);
            self.toolkit
                .place_in_layout(&outer, LayoutChild::Layout(&finished.object), cell, role)?;
        }
        Ok(())
    }

    /// Four per-side margin properties collapse into a single classic
    /// `margin` property when all are present and equal, or into an internal
    /// aggregate otherwise. A layout hosted by a wrapper widget gets a
    /// forced zero margin when nothing is specified.
    fn normalize_margins(&mut self, elem: &mut Element) {
        let left = self.int_property(elem, "leftMargin");
        let top = self.int_property(elem, "topMargin");
        let right = self.int_property(elem, "rightMargin");
        let bottom = self.int_property(elem, "bottomMargin");

        let sides = [left, top, right, bottom];
        let set: Vec<i64> = sides.iter().copied().filter(|m| *m >= 0).collect();
        if !set.is_empty() {
            if set.len() == 4 && set.iter().all(|m| *m == set[0]) {
                inject_number_property(elem, MARGIN_PROP, &[set[0]]);
            } else {
                inject_number_property(elem, CONTENTS_MARGINS_PROP, &sides);
            }
        } else if self.layout_widget {
            inject_number_property(elem, MARGIN_PROP, &[0]);
            // Only the outermost layout of the wrapper is affected.
            self.layout_widget = false;
        }
    }

    fn normalize_spacing(&mut self, elem: &mut Element) {
        let horizontal = self.int_property(elem, "horizontalSpacing");
        let vertical = self.int_property(elem, "verticalSpacing");
        if horizontal >= 0 || vertical >= 0 {
            inject_number_property(elem, SPACING_PROP, &[horizontal, vertical]);
        }
    }

    fn int_property(&mut self, elem: &Element, name: &str) -> i64 {
        self.resolver
            .property(elem, name)
            .and_then(|v| v.as_int())
            .unwrap_or(-1)
    }

    fn configure_layout(
        &mut self,
        elem: &Element,
        layout: &T::Object,
        kind: LayoutKind,
    ) -> Result<()> {
        match kind {
            LayoutKind::Grid => {
                self.apply_index_array(
                    elem,
                    "columnminimumwidth",
                    layout,
                    LayoutIndexProp::ColumnMinimumWidth,
                )?;
                self.apply_index_array(
                    elem,
                    "rowminimumheight",
                    layout,
                    LayoutIndexProp::RowMinimumHeight,
                )?;
                self.apply_index_array(elem, "columnstretch", layout, LayoutIndexProp::ColumnStretch)?;
                self.apply_index_array(elem, "rowstretch", layout, LayoutIndexProp::RowStretch)?;
            }
            kind if kind.is_box() => {
                self.apply_index_array(elem, "stretch", layout, LayoutIndexProp::Stretch)?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Applies a comma-separated per-index attribute list; zero and negative
    /// entries mean "leave the default".
    fn apply_index_array(
        &mut self,
        elem: &Element,
        attr: &str,
        layout: &T::Object,
        prop: LayoutIndexProp,
    ) -> Result<()> {
        let Some(list) = elem.attr(attr) else {
            return Ok(());
        };
        if list.is_empty() {
            return Ok(());
        }
        for (index, raw) in list.split(',').enumerate() {
            let value: i32 = raw
                .trim()
                .parse()
                .map_err(|_| Error::Document(format!("bad {attr} entry {raw:?}")))?;
            if value > 0 {
                self.toolkit
                    .set_layout_index_prop(layout, prop, index as i32, value)?;
            }
        }
        Ok(())
    }

    fn create_spacer(&mut self, elem: &Element) -> Result<()> {
        let width = elem
            .find_path_text(&["property", "size", "width"])
            .and_then(|t| t.trim().parse::<i32>().ok());
        let height = elem
            .find_path_text(&["property", "size", "height"])
            .and_then(|t| t.trim().parse::<i32>().ok());
        let size = width.zip(height);

        let size_type = self
            .resolver
            .property(elem, "sizeType")
            .unwrap_or_else(|| Value::Enum("QSizePolicy::Expanding".into()));
        let horizontal = self
            .resolver
            .property(elem, "orientation")
            .is_some_and(|v| v.matches_enum("Qt::Horizontal"));
        let minimum = Value::Enum("QSizePolicy::Minimum".into());
        // The spacer expands along its orientation; the cross axis stays at
        // minimum.
        let (h_policy, v_policy) = if horizontal {
            (size_type, minimum)
        } else {
            (minimum, size_type)
        };

        let name = self.unique_name("spacerItem");
        let spacer = self
            .toolkit
            .create_spacer(&name, size, &h_policy, &v_policy)?;

        if let Some(parent_layout) = self.stack.peek().filter(|p| p.kind.is_layout()) {
            let layout = parent_layout.object.clone();
            let layout_kind = parent_layout.kind;
            let cell = read_scratch(elem);
            let role = form_role_for(layout_kind, cell);
            self.toolkit
                .place_in_layout(&layout, LayoutChild::Spacer(&spacer), cell, role)?;
        }
        Ok(())
    }

    fn handle_item(&mut self, elem: &mut Element) -> Result<()> {
        if self.stack.top_is_layout() {
            // The wrapper's grid position travels to the wrapped node via a
            // scratch attribute.
            let cell = GridPos::of(elem);
            if let Some(first) = elem.children.first_mut() {
                first.set_attr(SCRATCH_GRID_POS, encode_scratch(cell));
            }
            return self.traverse(elem);
        }

        let Some(top) = self
            .stack
            .top_widget()
            .map(|p| (p.object.clone(), p.kind))
        else {
            return Ok(());
        };
        let (widget, kind) = top;
        let Some(widget_kind) = kind.widget() else {
            return Ok(());
        };

        match widget_kind {
            WidgetKind::ComboBox => {
                let text = self.resolver.property(elem, "text");
                let icon = self
                    .resolver
                    .property(elem, "icon")
                    .filter(Value::is_truthy);
                self.toolkit.combo_add_item(&widget, icon)?;
                self.toolkit
                    .combo_set_item_text(&widget, self.items.item_nr, text)?;
            }
            WidgetKind::ListWidget => {
                self.defer_sorting(&widget)?;
                let item = self.build_widget_item(
                    "QListWidgetItem",
                    elem,
                    &widget,
                    ItemAt::ListRow(self.items.item_nr),
                )?;
                self.toolkit.list_add_item(&widget, &item)?;
            }
            WidgetKind::TreeWidget => self.handle_tree_item(elem, &widget)?,
            WidgetKind::TableWidget => {
                let row = int_attr(elem, "row")?;
                let column = int_attr(elem, "column")?;
                self.defer_sorting(&widget)?;
                let item = self.build_widget_item(
                    "QTableWidgetItem",
                    elem,
                    &widget,
                    ItemAt::TableCell(row, column),
                )?;
                self.toolkit.table_set_item(&widget, row, column, &item)?;
            }
            _ => {}
        }

        self.items.item_nr += 1;
        Ok(())
    }

    /// Captures and disables the sorting flag before the first insertion;
    /// it is restored once the widget is fully populated.
    fn defer_sorting(&mut self, widget: &T::Object) -> Result<()> {
        if self.items.item_nr == 0 {
            self.items.sorting_was = Some(self.toolkit.is_sorting_enabled(widget)?);
            self.toolkit.set_sorting_enabled(widget, false)?;
        }
        Ok(())
    }

    fn handle_tree_item(&mut self, elem: &mut Element, tree: &T::Object) -> Result<()> {
        let parent = match self.items.item_stack.last() {
            Some((item, _)) => item.clone(),
            None => tree.clone(),
        };

        let item = self.toolkit.create(
            "QTreeWidgetItem",
            &format!("item_{}", self.items.item_stack.len()),
            Some(&parent),
            false,
        )?;

        if self.items.item_nr == 0 && self.items.item_stack.is_empty() {
            self.items.sorting_was = Some(self.toolkit.is_sorting_enabled(tree)?);
            self.toolkit.set_sorting_enabled(tree, false)?;
        }

        self.items.item_stack.push((item.clone(), self.items.item_nr));
        self.items.item_nr = 0;

        // Text must be set through the item fetched off the live tree so the
        // translation machinery touches the real object.
        let path: Vec<i32> = self.items.item_stack.iter().map(|(_, nr)| *nr).collect();
        let live = self
            .toolkit
            .item_handle(tree, ItemAt::TreePath(path))?
            .ok_or_else(|| Error::Toolkit("tree item not reachable through its path".into()))?;

        // Each text property opens the next column; the other properties
        // apply to the column reached so far.
        let mut column = -1i32;
        for child in &elem.children {
            if child.tag != "property" {
                continue;
            }
            let Some(prop_name) = child.attr("name") else {
                continue;
            };
            let value = self.resolver.decode(child);
            if prop_name == "text" {
                column += 1;
                if let Some(v) = value.filter(Value::is_truthy) {
                    self.toolkit
                        .set_item_field(&live, Some(column), ItemField::Text, &v)?;
                }
                continue;
            }
            let Some(value) = value else { continue };
            match prop_name {
                "statusTip" => {
                    self.toolkit
                        .set_item_field(&item, Some(column), ItemField::StatusTip, &value)?
                }
                "toolTip" => {
                    self.toolkit
                        .set_item_field(&item, Some(column), ItemField::ToolTip, &value)?
                }
                "whatsThis" => {
                    self.toolkit
                        .set_item_field(&item, Some(column), ItemField::WhatsThis, &value)?
                }
                "font" => self
                    .toolkit
                    .set_item_field(&item, Some(column), ItemField::Font, &value)?,
                "icon" => self
                    .toolkit
                    .set_item_field(&item, Some(column), ItemField::Icon, &value)?,
                "background" => {
                    self.toolkit
                        .set_item_field(&item, Some(column), ItemField::Background, &value)?
                }
                "foreground" => {
                    self.toolkit
                        .set_item_field(&item, Some(column), ItemField::Foreground, &value)?
                }
                "flags" => self
                    .toolkit
                    .set_item_field(&item, None, ItemField::Flags, &value)?,
                "checkState" => {
                    self.toolkit
                        .set_item_field(&item, Some(column), ItemField::CheckState, &value)?
                }
                _ => {}
            }
        }

        self.traverse(elem)?;
        if let Some((_, sibling_nr)) = self.items.item_stack.pop() {
            self.items.item_nr = sibling_nr;
        }
        Ok(())
    }

    /// Builds a generic data item shared by list rows, table cells and
    /// table header entries.
    fn build_widget_item(
        &mut self,
        class: &str,
        elem: &Element,
        owner: &T::Object,
        at: ItemAt,
    ) -> Result<T::Object> {
        let item = self.toolkit.create(class, "item", None, false)?;

        let text = self.resolver.property(elem, "text");
        let status_tip = self.resolver.property(elem, "statusTip");
        let tool_tip = self.resolver.property(elem, "toolTip");
        let whats_this = self.resolver.property(elem, "whatsThis");

        // Translatable strings are re-resolved later through the owner's
        // accessor; prime it before anything is set.
        if [&text, &status_tip, &tool_tip, &whats_this]
            .iter()
            .any(|v| v.as_ref().is_some_and(Value::is_translatable))
        {
            let _ = self.toolkit.item_handle(owner, at)?;
        }

        let texts = [
            (ItemField::Text, text),
            (ItemField::StatusTip, status_tip),
            (ItemField::ToolTip, tool_tip),
            (ItemField::WhatsThis, whats_this),
        ];
        for (field, value) in texts {
            if let Some(v) = value.filter(Value::is_truthy) {
                self.toolkit.set_item_field(&item, None, field, &v)?;
            }
        }

        let decorations = [
            (ItemField::TextAlignment, "textAlignment"),
            (ItemField::Font, "font"),
            (ItemField::Icon, "icon"),
            (ItemField::Background, "background"),
            (ItemField::Foreground, "foreground"),
        ];
        for (field, name) in decorations {
            if let Some(v) = self.resolver.property(elem, name).filter(Value::is_truthy) {
                self.toolkit.set_item_field(&item, None, field, &v)?;
            }
        }

        // Presence is what matters for these two: zero flags and an
        // unchecked state are still explicit settings.
        for (field, name) in [(ItemField::Flags, "flags"), (ItemField::CheckState, "checkState")] {
            if let Some(v) = self.resolver.property(elem, name) {
                self.toolkit.set_item_field(&item, None, field, &v)?;
            }
        }

        Ok(item)
    }

    fn add_header(&mut self, elem: &Element) -> Result<()> {
        let Some(top) = self
            .stack
            .top_widget()
            .map(|p| (p.object.clone(), p.kind))
        else {
            return Ok(());
        };
        let (widget, kind) = top;

        match kind.widget() {
            Some(WidgetKind::TreeWidget) => {
                let column = self.items.column_counter;
                let header = self
                    .toolkit
                    .item_handle(&widget, ItemAt::TreeHeader)?
                    .ok_or_else(|| Error::Toolkit("tree widget has no header item".into()))?;
                let fields = [
                    (ItemField::Text, "text"),
                    (ItemField::StatusTip, "statusTip"),
                    (ItemField::ToolTip, "toolTip"),
                    (ItemField::WhatsThis, "whatsThis"),
                    (ItemField::TextAlignment, "textAlignment"),
                    (ItemField::Font, "font"),
                    (ItemField::Icon, "icon"),
                    (ItemField::Background, "background"),
                    (ItemField::Foreground, "foreground"),
                ];
                for (field, name) in fields {
                    if let Some(v) = self.resolver.property(elem, name).filter(Value::is_truthy) {
                        self.toolkit
                            .set_item_field(&header, Some(column), field, &v)?;
                    }
                }
                // The column advances whether or not anything was set.
                self.items.column_counter += 1;
            }
            Some(WidgetKind::TableWidget) => {
                // Bare column/row nodes only size the table; they carry no
                // header item and leave the counters alone.
                if elem.children.is_empty() {
                    return Ok(());
                }
                match elem.tag.as_str() {
                    "column" => {
                        let column = self.items.column_counter;
                        let item = self.build_widget_item(
                            "QTableWidgetItem",
                            elem,
                            &widget,
                            ItemAt::HorizontalHeader(column),
                        )?;
                        self.toolkit
                            .set_header_item(&widget, HeaderSide::Horizontal, column, &item)?;
                        self.items.column_counter += 1;
                    }
                    "row" => {
                        let row = self.items.row_counter;
                        let item = self.build_widget_item(
                            "QTableWidgetItem",
                            elem,
                            &widget,
                            ItemAt::VerticalHeader(row),
                        )?;
                        self.toolkit
                            .set_header_item(&widget, HeaderSide::Vertical, row, &item)?;
                        self.items.row_counter += 1;
                    }
                    _ => {}
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn record_action_ref(&mut self, elem: &Element) {
        let Some(name) = elem.attr("name") else {
            debug!("addaction without a name, skipped");
            return;
        };
        if let Some(owner) = self.stack.top_widget() {
            self.actions.push((owner.object.clone(), name.to_string()));
        }
    }

    fn create_action(&mut self, elem: &Element) -> Result<()> {
        let parent = self
            .current_action_group
            .clone()
            .or_else(|| self.toplevel.clone());
        self.setup_object("QAction", parent.as_ref(), elem, true)?;
        Ok(())
    }

    fn create_action_group(&mut self, elem: &mut Element) -> Result<()> {
        let toplevel = self.toplevel.clone();
        let group = self.setup_object("QActionGroup", toplevel.as_ref(), elem, true)?;
        self.current_action_group = Some(group);
        self.traverse(elem)?;
        self.current_action_group = None;
        Ok(())
    }

    fn create_user_interface(&mut self, elem: &mut Element) -> Result<()> {
        let Some(class) = elem.attr("class").map(str::to_string) else {
            return Err(Error::Document("top-level widget without class attribute".into()));
        };
        let mut name = elem.attr("name").unwrap_or_default().to_string();
        if name.is_empty() {
            name = derive_toplevel_name(&class);
        }

        let kind = self.classes.widget_kind(&class);
        let toplevel = self.toolkit.create(&class, &name, None, false)?;
        debug!("top-level widget is {class} {name}");
        self.toplevel = Some(toplevel.clone());
        self.resolver
            .apply_properties(&mut self.toolkit, &toplevel, elem)?;
        self.stack.push(Placed {
            object: toplevel,
            kind: ObjectKind::Widget(kind),
            class,
        });
        self.traverse(elem)?;
        let _ = self.stack.pop_widget();

        self.resolve_actions()?;
        self.resolve_buddies()?;
        self.apply_delayed_properties()?;
        Ok(())
    }

    /// Drains the recorded `addaction` references now that every named
    /// action exists.
    fn resolve_actions(&mut self) -> Result<()> {
        let pending = mem::take(&mut self.actions);
        for (owner, name) in &pending {
            if name == "separator" {
                self.toolkit.add_separator(owner)?;
                continue;
            }
            debug!("adding action {name}");
            let (object, kind) = self
                .registry
                .get(name)
                .cloned()
                .ok_or_else(|| Error::UnknownObject(name.clone()))?;
            match kind {
                ObjectKind::Widget(WidgetKind::Menu) => {
                    let action = self.toolkit.menu_action(&object)?;
                    self.toolkit.add_action(owner, &action)?;
                }
                // Groups are not addable; their members carry their own
                // references.
                ObjectKind::ActionGroup => {}
                _ => self.toolkit.add_action(owner, &object)?,
            }
        }
        Ok(())
    }

    fn resolve_buddies(&mut self) -> Result<()> {
        for (label, buddy_name) in self.resolver.take_buddies() {
            match self.registry.get(&buddy_name) {
                Some((buddy, _)) => self.toolkit.set_buddy(&label, buddy)?,
                None => debug!("buddy {buddy_name} does not exist"),
            }
        }
        Ok(())
    }

    fn apply_delayed_properties(&mut self) -> Result<()> {
        for delayed in self.resolver.take_delayed() {
            let target = if delayed.on_layout {
                self.toolkit.layout_of(&delayed.target)?
            } else {
                delayed.target.clone()
            };
            self.toolkit
                .call_setter(&target, &delayed.setter, &delayed.value)?;
        }
        Ok(())
    }

    fn create_connections(&mut self, elem: &Element) -> Result<()> {
        for conn in elem.find_all("connection") {
            let sender_name = require_text(conn, "sender")?;
            let signal = require_text(conn, "signal")?;
            let receiver_name = require_text(conn, "receiver")?;
            let slot = require_text(conn, "slot")?;

            let sender = self.named_object(sender_name)?;
            let receiver = self.named_object(receiver_name)?;
            let slot_name = slot.split('(').next().unwrap_or(slot);
            self.toolkit.connect(&sender, signal, &receiver, slot_name)?;
        }
        if let Some(root) = self.toplevel.clone() {
            self.toolkit.connect_slots_by_name(&root)?;
        }
        Ok(())
    }

    /// Resolves a name against the top-level object's attributes; the
    /// document's own class name denotes the top-level object itself.
    fn named_object(&self, name: &str) -> Result<T::Object> {
        if name == self.context_name {
            if let Some(toplevel) = &self.toplevel {
                return Ok(toplevel.clone());
            }
        }
        self.registry
            .get(name)
            .map(|(obj, _)| obj.clone())
            .ok_or_else(|| Error::UnknownObject(name.to_string()))
    }

    fn apply_tab_order(&mut self, elem: &Element) -> Result<()> {
        let mut last: Option<T::Object> = None;
        for stop in &elem.children {
            let Some(name) = stop.text.as_deref() else {
                continue;
            };
            let widget = self
                .registry
                .get(name)
                .map(|(obj, _)| obj.clone())
                .ok_or_else(|| Error::UnknownObject(name.to_string()))?;
            if let Some(previous) = &last {
                self.toolkit.set_tab_order(previous, &widget)?;
            }
            last = Some(widget);
        }
        Ok(())
    }

    fn read_defaults(&mut self, elem: &Element) {
        if let Some(margin) = elem.attr("margin").and_then(|s| s.parse().ok()) {
            self.default_margin = margin;
        }
        if let Some(spacing) = elem.attr("spacing").and_then(|s| s.parse().ok()) {
            self.default_spacing = spacing;
        }
        self.resolver
            .set_defaults(self.default_margin, self.default_spacing);
    }

    fn register_custom_widgets(&mut self, elem: &Element) -> Result<()> {
        for custom in elem.find_all("customwidget") {
            let Some(class) = custom.child_text("class") else {
                debug!("customwidget without a class, skipped");
                continue;
            };
            // Legacy compatibility classes are not constructible.
            if class.starts_with("Q3") {
                return Err(Error::NoSuchWidget(class.to_string()));
            }
            let extends = custom.child_text("extends").unwrap_or("QWidget");
            let header = custom.child_text("header").unwrap_or_default();
            let module = header_to_module(header)?;
            self.toolkit.register_custom_widget(class, extends, &module)?;
            self.classes.register_custom(class, extends);
        }
        Ok(())
    }
}

fn form_role_for(layout_kind: ObjectKind, cell: Option<GridPos>) -> Option<FormRole> {
    match layout_kind {
        ObjectKind::Layout(LayoutKind::Form) => cell.map(FormRole::for_position),
        _ => None,
    }
}

/// The default object name: class name minus its type-prefix character,
/// lowercased.
fn default_object_name(class: &str) -> String {
    let mut chars = class.chars();
    chars.next();
    chars.as_str().to_lowercase()
}

/// The top-level fallback name keeps the class's casing apart from the
/// first letter: `MainWindow` becomes `mainWindow`.
fn derive_toplevel_name(class: &str) -> String {
    let stripped = class.strip_prefix('Q').unwrap_or(class);
    let mut chars = stripped.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn encode_scratch(cell: Option<GridPos>) -> String {
    match cell {
        Some(c) => format!("{},{},{},{}", c.row, c.column, c.row_span, c.col_span),
        None => String::new(),
    }
}

fn read_scratch(elem: &Element) -> Option<GridPos> {
    let raw = elem.attr(SCRATCH_GRID_POS)?;
    if raw.is_empty() {
        return None;
    }
    let parts: Vec<i32> = raw.split(',').filter_map(|p| p.parse().ok()).collect();
    match parts[..] {
        [row, column, row_span, col_span] => Some(GridPos {
            row,
            column,
            row_span,
            col_span,
        }),
        _ => None,
    }
}

fn int_attr(elem: &Element, name: &str) -> Result<i32> {
    elem.attr(name)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| Error::Document(format!("{} element needs an integer {name} attribute", elem.tag)))
}

fn require_text<'a>(elem: &'a Element, tag: &str) -> Result<&'a str> {
    elem.child_text(tag)
        .ok_or_else(|| Error::Document(format!("connection without {tag}")))
}

fn inject_number_property(elem: &mut Element, name: &str, values: &[i64]) {
    let mut prop = Element::new("property");
    prop.set_attr("name", name);
    for value in values {
        prop.children
            .push(Element::new("number").with_text(value.to_string()));
    }
    elem.children.push(prop);
}

/// Converts a slash-separated header path into a dotted module path,
/// dropping the `.h` suffix and empty or current-directory segments.
fn header_to_module(header: &str) -> Result<String> {
    let header = header.strip_suffix(".h").unwrap_or(header);
    let mut parts = Vec::new();
    for part in header.split('/') {
        match part {
            "" | "." => {}
            ".." => return Err(Error::InvalidHeaderPath(header.to_string())),
            part => parts.push(part),
        }
    }
    Ok(parts.join("."))
}

/// Collects generated resource-module names from `<include location>`
/// descendants, preserving first-seen order.
fn collect_resource_modules(elem: &Element, out: &mut Vec<String>) {
    for child in &elem.children {
        if child.tag == "include" {
            if let Some(stem) = child.attr("location").and_then(|l| l.strip_suffix(".qrc")) {
                let base = stem.rsplit('/').next().unwrap_or(stem);
                let module = format!("{base}_rc");
                if !out.contains(&module) {
                    out.push(module);
                }
            }
        }
        collect_resource_modules(child, out);
    }
}
