//! Data widgets: combo/list/tree/table items, headers and sorting deferral.

use formwork_dom::Value;
use formwork_loader::{
    Builder, Built, GraphResolver, GraphToolkit, HeaderProp, HeaderSide, ItemField, ObjectId,
};

fn build(xml: &str) -> (Builder<GraphToolkit, GraphResolver>, Built<ObjectId>) {
    let mut doc = formwork_uifile::read_str(xml).expect("parse document");
    let mut builder = Builder::new(GraphToolkit::new(), GraphResolver::new());
    let built = builder.build(&mut doc).expect("build document");
    (builder, built)
}

#[test]
fn combo_items_take_icons_and_indexed_text() {
    let (builder, built) = build(
        r#"<ui version="4.0">
             <widget class="QComboBox" name="combo">
               <item>
                 <property name="text"><string>First</string></property>
               </item>
               <item>
                 <property name="icon"><iconset>:/icons/x.png</iconset></property>
                 <property name="text"><string>Second</string></property>
               </item>
             </widget>
           </ui>"#,
    );

    let graph = builder.toolkit();
    let combo = graph.node(built.root);
    assert_eq!(combo.combo_items.len(), 2);
    assert_eq!(combo.combo_items[0].icon, None);
    assert_eq!(combo.combo_items[0].text, Some(Value::Tr("First".into())));
    assert_eq!(
        combo.combo_items[1].icon,
        Some(Value::Icon(":/icons/x.png".into()))
    );
    assert_eq!(combo.combo_items[1].text, Some(Value::Tr("Second".into())));
}

#[test]
fn list_population_defers_sorting_once() {
    let (builder, built) = build(
        r#"<ui version="4.0">
             <widget class="QListWidget" name="list">
               <property name="sortingEnabled"><bool>true</bool></property>
               <item><property name="text"><string>cherry</string></property></item>
               <item><property name="text"><string>apple</string></property></item>
               <item><property name="text"><string>banana</string></property></item>
             </widget>
           </ui>"#,
    );

    let graph = builder.toolkit();
    let list = graph.node(built.root);
    assert_eq!(list.list_items.len(), 3);

    // Disabled once before the first insert, restored once to the captured
    // value after the last.
    assert_eq!(list.sorting_sets, vec![false, true]);
    assert!(list.sorting_enabled);

    let first = graph.node(list.list_items[0]);
    assert_eq!(first.class, "QListWidgetItem");
    assert_eq!(
        first.item_fields,
        vec![(None, ItemField::Text, Value::Tr("cherry".into()))]
    );
}

#[test]
fn unsorted_list_restores_a_disabled_flag() {
    let (builder, built) = build(
        r#"<ui version="4.0">
             <widget class="QListWidget" name="list">
               <item><property name="text"><string>only</string></property></item>
             </widget>
           </ui>"#,
    );

    let list = builder.toolkit().node(built.root);
    assert_eq!(list.sorting_sets, vec![false, false]);
    assert!(!list.sorting_enabled);
}

#[test]
fn widget_item_flags_and_check_state_apply_even_when_falsy() {
    let (builder, built) = build(
        r#"<ui version="4.0">
             <widget class="QListWidget" name="list">
               <item>
                 <property name="text"><string>entry</string></property>
                 <property name="flags"><number>0</number></property>
                 <property name="checkState"><number>0</number></property>
                 <property name="statusTip"><string></string></property>
               </item>
             </widget>
           </ui>"#,
    );

    let graph = builder.toolkit();
    let item = graph.node(graph.node(built.root).list_items[0]);
    let fields: Vec<ItemField> = item.item_fields.iter().map(|(_, f, _)| *f).collect();
    // Zero flags and an unchecked state are explicit settings.
    assert!(fields.contains(&ItemField::Flags));
    assert!(fields.contains(&ItemField::CheckState));
    // The empty status tip is falsy and stays unset.
    assert!(!fields.contains(&ItemField::StatusTip));
}

#[test]
fn tree_item_text_advances_the_column_counter() {
    let (builder, built) = build(
        r#"<ui version="4.0">
             <widget class="QTreeWidget" name="tree">
               <property name="sortingEnabled"><bool>true</bool></property>
               <item>
                 <property name="text"><string>col0</string></property>
                 <property name="icon"><iconset>:/i.png</iconset></property>
                 <property name="text"><string>col1</string></property>
                 <property name="toolTip"><string>tip</string></property>
               </item>
             </widget>
           </ui>"#,
    );

    let graph = builder.toolkit();
    let tree = graph.node(built.root);
    assert_eq!(tree.children.len(), 1);
    assert_eq!(tree.sorting_sets, vec![false, true]);

    let item = graph.node(tree.children[0]);
    assert_eq!(item.class, "QTreeWidgetItem");
    assert_eq!(
        item.item_fields,
        vec![
            (Some(0), ItemField::Text, Value::Tr("col0".into())),
            (Some(0), ItemField::Icon, Value::Icon(":/i.png".into())),
            (Some(1), ItemField::Text, Value::Tr("col1".into())),
            (Some(1), ItemField::ToolTip, Value::Tr("tip".into())),
        ]
    );
}

#[test]
fn tree_items_nest_along_the_item_stack() {
    let (builder, built) = build(
        r#"<ui version="4.0">
             <widget class="QTreeWidget" name="tree">
               <item>
                 <property name="text"><string>parent</string></property>
                 <item>
                   <property name="text"><string>child</string></property>
                 </item>
               </item>
               <item>
                 <property name="text"><string>second</string></property>
               </item>
             </widget>
           </ui>"#,
    );

    let graph = builder.toolkit();
    let tree = graph.node(built.root);
    // Two top-level items; the nested one hangs off the first.
    assert_eq!(tree.children.len(), 2);

    let parent = graph.node(tree.children[0]);
    assert_eq!(parent.children.len(), 1);
    assert_eq!(
        parent.item_fields[0],
        (Some(0), ItemField::Text, Value::Tr("parent".into()))
    );

    let child = graph.node(parent.children[0]);
    assert_eq!(
        child.item_fields[0],
        (Some(0), ItemField::Text, Value::Tr("child".into()))
    );

    // The second top-level item lands at index 1 of the tree, not of the
    // nested item.
    let second = graph.node(tree.children[1]);
    assert_eq!(
        second.item_fields[0],
        (Some(0), ItemField::Text, Value::Tr("second".into()))
    );

    // Sorting was captured once, before the first top-level item only.
    assert_eq!(tree.sorting_sets, vec![false, false]);
}

#[test]
fn tree_header_columns_advance_even_when_empty() {
    let (builder, built) = build(
        r#"<ui version="4.0">
             <widget class="QTreeWidget" name="tree">
               <column>
                 <property name="text"><string>A</string></property>
               </column>
               <column/>
               <column>
                 <property name="text"><string>C</string></property>
               </column>
             </widget>
           </ui>"#,
    );

    let graph = builder.toolkit();
    let header = graph.tree_header(built.root).expect("header item");
    assert_eq!(
        graph.node(header).item_fields,
        vec![
            (Some(0), ItemField::Text, Value::Tr("A".into())),
            (Some(2), ItemField::Text, Value::Tr("C".into())),
        ]
    );
}

#[test]
fn table_shape_is_inferred_from_column_and_row_nodes() {
    let (builder, built) = build(
        r#"<ui version="4.0">
             <widget class="QTableWidget" name="table">
               <column>
                 <property name="text"><string>Name</string></property>
               </column>
               <column>
                 <property name="text"><string>Age</string></property>
               </column>
               <row>
                 <property name="text"><string>R1</string></property>
               </row>
               <item row="0" column="1">
                 <property name="text"><string>cell</string></property>
               </item>
             </widget>
           </ui>"#,
    );

    let graph = builder.toolkit();
    let table = graph.node(built.root);
    assert_eq!(table.column_count, Some(2));
    assert_eq!(table.row_count, Some(1));

    let headers: Vec<(HeaderSide, i32)> = table
        .header_items
        .iter()
        .map(|(side, index, _)| (*side, *index))
        .collect();
    assert_eq!(
        headers,
        vec![
            (HeaderSide::Horizontal, 0),
            (HeaderSide::Horizontal, 1),
            (HeaderSide::Vertical, 0)
        ]
    );
    let (_, _, first_header) = table.header_items[0];
    assert_eq!(
        graph.node(first_header).item_fields,
        vec![(None, ItemField::Text, Value::Tr("Name".into()))]
    );

    assert_eq!(table.table_items.len(), 1);
    let (row, column, cell) = table.table_items[0];
    assert_eq!((row, column), (0, 1));
    assert_eq!(
        graph.node(cell).item_fields,
        vec![(None, ItemField::Text, Value::Tr("cell".into()))]
    );
}

#[test]
fn explicit_counts_suppress_shape_inference() {
    let (builder, built) = build(
        r#"<ui version="4.0">
             <widget class="QTableWidget" name="table">
               <property name="columnCount"><number>5</number></property>
               <column>
                 <property name="text"><string>Only</string></property>
               </column>
             </widget>
           </ui>"#,
    );

    let graph = builder.toolkit();
    let table = graph.node(built.root);
    // The property wins; only the row count is inferred.
    assert_eq!(table.property("columnCount"), Some(&Value::Int(5)));
    assert_eq!(table.column_count, None);
    assert_eq!(table.row_count, Some(0));
}

#[test]
fn bare_table_columns_carry_no_header_item() {
    let (builder, built) = build(
        r#"<ui version="4.0">
             <widget class="QTableWidget" name="table">
               <column/>
               <column>
                 <property name="text"><string>Second</string></property>
               </column>
             </widget>
           </ui>"#,
    );

    let graph = builder.toolkit();
    let table = graph.node(built.root);
    assert_eq!(table.column_count, Some(2));
    // Only the populated column produced a header item, and the counter did
    // not advance for the empty one.
    assert_eq!(table.header_items.len(), 1);
    assert_eq!(table.header_items[0].0, HeaderSide::Horizontal);
    assert_eq!(table.header_items[0].1, 0);
}

#[test]
fn tree_view_header_attributes_apply_after_build() {
    let (builder, built) = build(
        r#"<ui version="4.0">
             <widget class="QTreeView" name="view">
               <attribute name="headerVisible"><bool>false</bool></attribute>
               <attribute name="headerDefaultSectionSize"><number>44</number></attribute>
             </widget>
           </ui>"#,
    );

    let graph = builder.toolkit();
    let view = graph.node(built.root);
    assert!(view.header_props.contains(&(
        HeaderSide::Tree,
        HeaderProp::Visible,
        Value::Bool(false)
    )));
    assert!(view.header_props.contains(&(
        HeaderSide::Tree,
        HeaderProp::DefaultSectionSize,
        Value::Int(44)
    )));
}

#[test]
fn table_view_headers_apply_to_both_sides() {
    let (builder, built) = build(
        r#"<ui version="4.0">
             <widget class="QTableView" name="view">
               <attribute name="horizontalHeaderStretchLastSection"><bool>true</bool></attribute>
               <attribute name="verticalHeaderVisible"><bool>false</bool></attribute>
             </widget>
           </ui>"#,
    );

    let graph = builder.toolkit();
    let view = graph.node(built.root);
    assert!(view.header_props.contains(&(
        HeaderSide::Horizontal,
        HeaderProp::StretchLastSection,
        Value::Bool(true)
    )));
    assert!(view.header_props.contains(&(
        HeaderSide::Vertical,
        HeaderProp::Visible,
        Value::Bool(false)
    )));
}

#[test]
fn buttons_join_their_named_group() {
    let (builder, _) = build(
        r#"<ui version="4.0">
             <widget class="QWidget" name="Form">
               <layout class="QVBoxLayout" name="col">
                 <item>
                   <widget class="QRadioButton" name="yes">
                     <attribute name="buttonGroup">
                       <string notr="true">answers</string>
                     </attribute>
                   </widget>
                 </item>
                 <item>
                   <widget class="QRadioButton" name="no">
                     <attribute name="buttonGroup">
                       <string notr="true">answers</string>
                     </attribute>
                   </widget>
                 </item>
               </layout>
             </widget>
           </ui>"#,
    );

    let graph = builder.toolkit();
    let group = graph.find("answers").expect("group exists");
    let node = graph.node(group);
    assert_eq!(node.class, "QButtonGroup");
    let yes = graph.find("yes").expect("button");
    let no = graph.find("no").expect("button");
    // One group, created on the first reference, serves both buttons.
    assert_eq!(node.group_buttons, vec![yes, no]);
    assert_eq!(node.parent, graph.find("Form"));
}
