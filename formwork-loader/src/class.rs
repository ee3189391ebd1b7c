use std::collections::HashMap;

/// Classification of widget classes the placement logic dispatches on.
///
/// Anything without special container or data-item behavior is `Plain`;
/// custom widget classes resolve to the kind of their declared base class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WidgetKind {
    Plain,
    MainWindow,
    DockWidget,
    MdiArea,
    ScrollArea,
    StackedWidget,
    ToolBox,
    TabWidget,
    Wizard,
    ToolBar,
    MenuBar,
    Menu,
    StatusBar,
    TreeView,
    TreeWidget,
    TableView,
    TableWidget,
    ListWidget,
    ComboBox,
    Button,
}

impl WidgetKind {
    /// Containers that adopt children through a dedicated add/set call.
    /// Children of these are created without a constructor parent.
    pub fn adopts_by_api(self) -> bool {
        matches!(
            self,
            WidgetKind::DockWidget
                | WidgetKind::MdiArea
                | WidgetKind::ScrollArea
                | WidgetKind::StackedWidget
                | WidgetKind::ToolBox
                | WidgetKind::TabWidget
                | WidgetKind::Wizard
        )
    }

    pub fn is_tree_view(self) -> bool {
        matches!(self, WidgetKind::TreeView | WidgetKind::TreeWidget)
    }

    pub fn is_table_view(self) -> bool {
        matches!(self, WidgetKind::TableView | WidgetKind::TableWidget)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutKind {
    Grid,
    Form,
    HBox,
    VBox,
    Other,
}

impl LayoutKind {
    pub fn is_box(self) -> bool {
        matches!(self, LayoutKind::HBox | LayoutKind::VBox)
    }
}

/// What a created object is, as far as placement and reference resolution
/// are concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectKind {
    Widget(WidgetKind),
    Layout(LayoutKind),
    Action,
    ActionGroup,
}

impl ObjectKind {
    pub fn is_widget(self) -> bool {
        matches!(self, ObjectKind::Widget(_))
    }

    pub fn is_layout(self) -> bool {
        matches!(self, ObjectKind::Layout(_))
    }

    pub fn widget(self) -> Option<WidgetKind> {
        match self {
            ObjectKind::Widget(k) => Some(k),
            _ => None,
        }
    }
}

/// Maps class names to kinds, following custom-widget `extends` chains.
#[derive(Debug, Clone, Default)]
pub struct ClassMap {
    custom: HashMap<String, String>,
}

impl ClassMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a custom widget class and the class it extends.
    pub fn register_custom(&mut self, class: &str, extends: &str) {
        self.custom.insert(class.to_string(), extends.to_string());
    }

    pub fn widget_kind(&self, class: &str) -> WidgetKind {
        let mut current = class;
        // Bounded walk in case a document declares a cyclic extends chain.
        for _ in 0..32 {
            if let Some(kind) = builtin_widget_kind(current) {
                return kind;
            }
            match self.custom.get(current) {
                Some(base) => current = base,
                None => break,
            }
        }
        WidgetKind::Plain
    }

    pub fn layout_kind(&self, class: &str) -> LayoutKind {
        builtin_layout_kind(class).unwrap_or(LayoutKind::Other)
    }

    pub fn object_kind(&self, class: &str) -> ObjectKind {
        match class {
            "QAction" => ObjectKind::Action,
            "QActionGroup" => ObjectKind::ActionGroup,
            c => match builtin_layout_kind(c) {
                Some(kind) => ObjectKind::Layout(kind),
                None => ObjectKind::Widget(self.widget_kind(c)),
            },
        }
    }
}

fn builtin_widget_kind(class: &str) -> Option<WidgetKind> {
    Some(match class {
        "QWidget" | "QFrame" | "QDialog" | "QLabel" => WidgetKind::Plain,
        "QMainWindow" => WidgetKind::MainWindow,
        "QDockWidget" => WidgetKind::DockWidget,
        "QMdiArea" => WidgetKind::MdiArea,
        "QScrollArea" => WidgetKind::ScrollArea,
        "QStackedWidget" => WidgetKind::StackedWidget,
        "QToolBox" => WidgetKind::ToolBox,
        "QTabWidget" => WidgetKind::TabWidget,
        "QWizard" => WidgetKind::Wizard,
        "QToolBar" => WidgetKind::ToolBar,
        "QMenuBar" => WidgetKind::MenuBar,
        "QMenu" => WidgetKind::Menu,
        "QStatusBar" => WidgetKind::StatusBar,
        "QTreeView" => WidgetKind::TreeView,
        "QTreeWidget" => WidgetKind::TreeWidget,
        "QTableView" => WidgetKind::TableView,
        "QTableWidget" => WidgetKind::TableWidget,
        "QListWidget" => WidgetKind::ListWidget,
        "QComboBox" | "QFontComboBox" => WidgetKind::ComboBox,
        "QPushButton" | "QToolButton" | "QRadioButton" | "QCheckBox" | "QCommandLinkButton" => {
            WidgetKind::Button
        }
        _ => return None,
    })
}

fn builtin_layout_kind(class: &str) -> Option<LayoutKind> {
    Some(match class {
        "QGridLayout" => LayoutKind::Grid,
        "QFormLayout" => LayoutKind::Form,
        "QHBoxLayout" => LayoutKind::HBox,
        "QVBoxLayout" => LayoutKind::VBox,
        _ => return None,
    })
}
