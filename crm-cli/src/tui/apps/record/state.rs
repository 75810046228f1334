use std::path::PathBuf;
use std::time::Instant;

use crossterm::event::KeyCode;

use crate::metadata::{FieldDefinition, FieldMetadataItem, is_composite_field_type};
use crate::records::Record;
use crate::tui::widgets::{FieldContext, FieldFocus, InlineCell, InlineCellContainer, InlineCellProps};

pub struct InitParams {
    pub object: String,
    /// Active fields of the record's object, in display order
    pub fields: Vec<FieldMetadataItem>,
    pub record: Record,
    pub record_path: PathBuf,
    pub label_width: u16,
    pub show_labels: bool,
}

/// One field row of the editor
pub struct FieldRow {
    pub field: FieldMetadataItem,
    pub container: InlineCellContainer,
    pub cell: InlineCell,
    pub focus: FieldFocus,
    pub hovered_since: Option<Instant>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Save,
    Quit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 2] = [MenuItem::Save, MenuItem::Quit];

    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::Save => "Save record",
            MenuItem::Quit => "Quit",
        }
    }

    pub fn shortcut(&self) -> char {
        match self {
            MenuItem::Save => 's',
            MenuItem::Quit => 'q',
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandMenu {
    pub highlight: usize,
}

pub struct State {
    pub object: String,
    pub record: Record,
    pub record_path: PathBuf,
    pub rows: Vec<FieldRow>,
    /// Row under the pointer or keyboard cursor
    pub hovered: Option<usize>,
    /// Row whose inline cell is open
    pub editing: Option<usize>,
    pub menu: Option<CommandMenu>,
    pub dirty: bool,
    pub saved: bool,
    pub status: Option<Status>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    HoverEnter(usize),
    HoverLeave(usize),
    MoveHover(MoveHover),
    Click(usize),
    EditKey(KeyCode),
    Commit,
    CancelEdit,
    OpenMenu,
    CloseMenu,
    MenuMove(MoveHover),
    MenuActivate(usize),
    Save,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveHover {
    Up,
    Down,
}

/// Composite values have no single-line editor
pub fn is_field_readonly(field: &FieldMetadataItem) -> bool {
    field.is_read_only || is_composite_field_type(field.field_type)
}

impl State {
    pub fn new(params: InitParams) -> Self {
        let InitParams {
            object,
            fields,
            record,
            record_path,
            label_width,
            show_labels,
        } = params;

        let rows = fields
            .into_iter()
            .map(|field| {
                let props = InlineCellProps {
                    readonly: is_field_readonly(&field),
                    icon_label: Some(field.icon.clone().unwrap_or_else(|| "·".to_string())),
                    label: Some(field.label.clone()),
                    label_width: Some(label_width),
                    show_label: show_labels,
                    edit_mode_content_only: false,
                };
                let container = InlineCellContainer::new(
                    props,
                    FieldContext {
                        record_id: record.id.clone(),
                        field_definition: FieldDefinition::from_metadata_item(&field),
                    },
                );
                FieldRow {
                    field,
                    container,
                    cell: InlineCell::new(),
                    focus: FieldFocus::default(),
                    hovered_since: None,
                }
            })
            .collect();

        Self {
            object,
            record,
            record_path,
            rows,
            hovered: None,
            editing: None,
            menu: None,
            dirty: false,
            saved: false,
            status: None,
        }
    }

    /// Current display text of a row's field
    pub fn row_value(&self, idx: usize) -> String {
        self.rows
            .get(idx)
            .map(|row| self.record.display_value(&row.field))
            .unwrap_or_default()
    }
}
