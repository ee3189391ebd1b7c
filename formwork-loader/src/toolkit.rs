use formwork_dom::{Element, Value};

use crate::Result;

/// Grid placement decoded from `row`/`column`/`rowspan`/`colspan` attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridPos {
    pub row: i32,
    pub column: i32,
    pub row_span: i32,
    pub col_span: i32,
}

impl GridPos {
    /// Reads the placement tuple off an element. `row` and `column` are both
    /// required; their absence means "positional add" and yields `None`.
    /// Spans default to 1.
    pub fn of(elem: &Element) -> Option<GridPos> {
        let row = elem.attr("row")?.parse().ok()?;
        let column = elem.attr("column")?.parse().ok()?;
        let row_span = elem
            .attr("rowspan")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1);
        let col_span = elem
            .attr("colspan")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1);
        Some(GridPos {
            row,
            column,
            row_span,
            col_span,
        })
    }
}

/// The slot a child occupies in a two-column form layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormRole {
    Label,
    Field,
    Spanning,
}

impl FormRole {
    /// A spanning entry dominates; otherwise column 1 is the field slot and
    /// every other column is treated as the label slot.
    pub fn for_position(pos: GridPos) -> FormRole {
        if pos.col_span > 1 {
            FormRole::Spanning
        } else if pos.column == 1 {
            FormRole::Field
        } else {
            FormRole::Label
        }
    }
}

/// What is being inserted into a layout.
#[derive(Debug)]
pub enum LayoutChild<'a, O> {
    Widget(&'a O),
    Layout(&'a O),
    Spacer(&'a O),
}

/// Which header of an item view an operation targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderSide {
    /// A tree view's single header.
    Tree,
    Horizontal,
    Vertical,
}

/// The header settings read from `<attribute>` nodes after a view is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderProp {
    Visible,
    CascadingSectionResizes,
    DefaultSectionSize,
    HighlightSections,
    MinimumSectionSize,
    ShowSortIndicator,
    StretchLastSection,
}

impl HeaderProp {
    pub const ALL: [HeaderProp; 7] = [
        HeaderProp::Visible,
        HeaderProp::CascadingSectionResizes,
        HeaderProp::DefaultSectionSize,
        HeaderProp::HighlightSections,
        HeaderProp::MinimumSectionSize,
        HeaderProp::ShowSortIndicator,
        HeaderProp::StretchLastSection,
    ];

    /// The attribute-name suffix, appended to `header`, `horizontalHeader`
    /// or `verticalHeader`.
    pub fn attribute_suffix(self) -> &'static str {
        match self {
            HeaderProp::Visible => "Visible",
            HeaderProp::CascadingSectionResizes => "CascadingSectionResizes",
            HeaderProp::DefaultSectionSize => "DefaultSectionSize",
            HeaderProp::HighlightSections => "HighlightSections",
            HeaderProp::MinimumSectionSize => "MinimumSectionSize",
            HeaderProp::ShowSortIndicator => "ShowSortIndicator",
            HeaderProp::StretchLastSection => "StretchLastSection",
        }
    }
}

/// Addresses an item through its owning view's accessors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemAt {
    ListRow(i32),
    TableCell(i32, i32),
    /// Sibling indices from the top level down to the item.
    TreePath(Vec<i32>),
    TreeHeader,
    HorizontalHeader(i32),
    VerticalHeader(i32),
}

/// Settable fields of a data item (list/table/tree items and header items).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemField {
    Text,
    StatusTip,
    ToolTip,
    WhatsThis,
    TextAlignment,
    Font,
    Icon,
    Background,
    Foreground,
    Flags,
    CheckState,
}

/// Per-index layout configuration from comma-separated attribute lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutIndexProp {
    ColumnMinimumWidth,
    RowMinimumHeight,
    ColumnStretch,
    RowStretch,
    /// The single-axis stretch list of box layouts.
    Stretch,
}

/// The object factory and toolkit capability table the interpreter drives.
///
/// Everything the interpreter does to a live object goes through here, so a
/// backend can be a real widget toolkit, the recording graph used by tests
/// and the CLI, or anything else that can honor the construction protocol.
/// Handles are opaque; the interpreter never inspects them beyond cloning.
pub trait Toolkit {
    type Object: Clone + std::fmt::Debug;

    /// Creates a named object. `is_attribute` marks objects that become
    /// named attributes of the top-level object and thus resolvable by
    /// connections, tab stops and action references.
    fn create(
        &mut self,
        class: &str,
        name: &str,
        parent: Option<&Self::Object>,
        is_attribute: bool,
    ) -> Result<Self::Object>;

    /// Creates a spacer item from an optional fixed size and two size
    /// policies (horizontal, vertical). Spacers are never attributes.
    fn create_spacer(
        &mut self,
        name: &str,
        size: Option<(i32, i32)>,
        h_policy: &Value,
        v_policy: &Value,
    ) -> Result<Self::Object>;

    fn register_custom_widget(&mut self, class: &str, extends: &str, module: &str) -> Result<()>;

    fn set_property(&mut self, obj: &Self::Object, name: &str, value: &Value) -> Result<()>;

    /// Invokes a named setter; used for properties deferred until the whole
    /// tree exists.
    fn call_setter(&mut self, obj: &Self::Object, setter: &str, value: &Value) -> Result<()>;

    /// The layout installed on a widget, for delayed properties flagged as
    /// layout-targeted.
    fn layout_of(&mut self, widget: &Self::Object) -> Result<Self::Object>;

    /// Inserts a child into a layout. `cell` of `None` means positional
    /// append; `role` is set for form layouts with a known cell.
    fn place_in_layout(
        &mut self,
        layout: &Self::Object,
        child: LayoutChild<'_, Self::Object>,
        cell: Option<GridPos>,
        role: Option<FormRole>,
    ) -> Result<()>;

    fn set_layout_index_prop(
        &mut self,
        layout: &Self::Object,
        prop: LayoutIndexProp,
        index: i32,
        value: i32,
    ) -> Result<()>;

    fn add_toolbox_page(
        &mut self,
        toolbox: &Self::Object,
        page: &Self::Object,
        icon: Option<Value>,
        label: Option<Value>,
        tooltip: Option<Value>,
    ) -> Result<()>;

    fn add_tab_page(
        &mut self,
        tabs: &Self::Object,
        page: &Self::Object,
        icon: Option<Value>,
        title: Option<Value>,
        tooltip: Option<Value>,
    ) -> Result<()>;

    fn add_wizard_page(&mut self, wizard: &Self::Object, page: &Self::Object) -> Result<()>;

    fn add_stacked_page(&mut self, stack: &Self::Object, page: &Self::Object) -> Result<()>;

    /// Sets the single content widget of a dock widget or scroll area.
    fn set_area_widget(&mut self, area: &Self::Object, child: &Self::Object) -> Result<()>;

    fn set_central_widget(&mut self, window: &Self::Object, widget: &Self::Object) -> Result<()>;

    fn add_tool_bar(
        &mut self,
        window: &Self::Object,
        bar: &Self::Object,
        area: Option<Value>,
        break_before: bool,
    ) -> Result<()>;

    fn set_menu_bar(&mut self, window: &Self::Object, bar: &Self::Object) -> Result<()>;

    fn set_status_bar(&mut self, window: &Self::Object, bar: &Self::Object) -> Result<()>;

    fn add_dock_widget(
        &mut self,
        window: &Self::Object,
        dock: &Self::Object,
        area: Option<Value>,
    ) -> Result<()>;

    fn add_action(&mut self, owner: &Self::Object, action: &Self::Object) -> Result<()>;

    fn add_separator(&mut self, owner: &Self::Object) -> Result<()>;

    /// The action representing a menu, used when a menu name appears in an
    /// action list.
    fn menu_action(&mut self, menu: &Self::Object) -> Result<Self::Object>;

    fn combo_add_item(&mut self, combo: &Self::Object, icon: Option<Value>) -> Result<()>;

    /// Sets an entry's text after insertion; a separate call so translated
    /// text can be re-applied by index later.
    fn combo_set_item_text(
        &mut self,
        combo: &Self::Object,
        index: i32,
        text: Option<Value>,
    ) -> Result<()>;

    fn list_add_item(&mut self, list: &Self::Object, item: &Self::Object) -> Result<()>;

    fn table_set_item(
        &mut self,
        table: &Self::Object,
        row: i32,
        column: i32,
        item: &Self::Object,
    ) -> Result<()>;

    /// Fetches an item through the owner's accessor API. Returns `Ok(None)`
    /// when nothing occupies that slot yet; priming fetches run before the
    /// item is inserted and must not fail.
    fn item_handle(&mut self, owner: &Self::Object, at: ItemAt) -> Result<Option<Self::Object>>;

    /// Applies one field of a data item. `column` is set for tree and
    /// header items whose fields are per-column.
    fn set_item_field(
        &mut self,
        item: &Self::Object,
        column: Option<i32>,
        field: ItemField,
        value: &Value,
    ) -> Result<()>;

    fn set_header_item(
        &mut self,
        view: &Self::Object,
        side: HeaderSide,
        index: i32,
        item: &Self::Object,
    ) -> Result<()>;

    fn set_header_prop(
        &mut self,
        view: &Self::Object,
        side: HeaderSide,
        prop: HeaderProp,
        value: &Value,
    ) -> Result<()>;

    fn set_column_count(&mut self, view: &Self::Object, count: i32) -> Result<()>;

    fn set_row_count(&mut self, view: &Self::Object, count: i32) -> Result<()>;

    fn is_sorting_enabled(&mut self, view: &Self::Object) -> Result<bool>;

    fn set_sorting_enabled(&mut self, view: &Self::Object, enabled: bool) -> Result<()>;

    fn add_to_button_group(&mut self, group: &Self::Object, button: &Self::Object) -> Result<()>;

    fn set_buddy(&mut self, label: &Self::Object, buddy: &Self::Object) -> Result<()>;

    fn set_tab_order(&mut self, first: &Self::Object, second: &Self::Object) -> Result<()>;

    /// Wires one explicit connection. `signal` keeps its full signature;
    /// `slot` is the bare name.
    fn connect(
        &mut self,
        sender: &Self::Object,
        signal: &str,
        receiver: &Self::Object,
        slot: &str,
    ) -> Result<()>;

    /// The by-name convention pass, run once after explicit connections.
    fn connect_slots_by_name(&mut self, root: &Self::Object) -> Result<()>;

    /// Called after the whole document is interpreted, before internal
    /// state is reset.
    fn finalize(&mut self, _root: &Self::Object, _resources: &[String]) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_dom::elem;

    #[test]
    fn grid_position_requires_row_and_column() {
        let full = elem("item")
            .with_attr("row", "2")
            .with_attr("column", "1")
            .with_attr("rowspan", "1")
            .with_attr("colspan", "2");
        assert_eq!(
            GridPos::of(&full),
            Some(GridPos {
                row: 2,
                column: 1,
                row_span: 1,
                col_span: 2
            })
        );

        let spans_default = elem("item").with_attr("row", "0").with_attr("column", "3");
        let pos = GridPos::of(&spans_default).expect("position");
        assert_eq!((pos.row_span, pos.col_span), (1, 1));

        assert_eq!(GridPos::of(&elem("item").with_attr("column", "1")), None);
        assert_eq!(GridPos::of(&elem("item")), None);
    }

    #[test]
    fn form_roles() {
        let at = |row, column, col_span| GridPos {
            row,
            column,
            row_span: 1,
            col_span,
        };
        assert_eq!(FormRole::for_position(at(0, 0, 1)), FormRole::Label);
        assert_eq!(FormRole::for_position(at(0, 1, 1)), FormRole::Field);
        // Spanning wins over the column number.
        assert_eq!(FormRole::for_position(at(0, 0, 2)), FormRole::Spanning);
        assert_eq!(FormRole::for_position(at(0, 1, 2)), FormRole::Spanning);
        // Column 0 is the label slot no matter how many columns exist.
        assert_eq!(FormRole::for_position(at(3, 2, 1)), FormRole::Label);
    }
}
