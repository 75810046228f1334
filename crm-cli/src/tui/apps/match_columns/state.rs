use crate::config::ImportConfig;
use crate::import::{
    ColumnMatches, ImportedColumn, SelectOption, build_options, suggest_options,
};
use crate::metadata::FieldMetadataItem;
use crate::tui::dropdown::DropdownRegistry;
use crate::tui::widgets::{ColumnFieldSelect, ColumnSelectEvent, SelectContext};

pub struct InitParams {
    pub object: String,
    /// Importable fields of the target object
    pub fields: Vec<FieldMetadataItem>,
    pub columns: Vec<ImportedColumn>,
    pub import_config: ImportConfig,
}

pub struct State {
    pub object: String,
    pub fields: Vec<FieldMetadataItem>,
    pub options: Vec<SelectOption>,
    pub matches: ColumnMatches,
    /// Suggested options per column, same order as `matches`
    pub suggestions: Vec<Vec<SelectOption>>,
    pub selectors: Vec<ColumnFieldSelect>,
    pub dropdowns: DropdownRegistry,
    pub cursor: usize,
    pub confirmed: bool,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    MoveCursor(MoveCursor),
    FocusColumn(usize),
    Select(usize, ColumnSelectEvent),
    ClearColumn,
    Confirm,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveCursor {
    Up,
    Down,
    First,
    Last,
}

impl State {
    pub fn new(params: InitParams) -> Self {
        let InitParams {
            object,
            fields,
            columns,
            import_config,
        } = params;

        let options = build_options(&fields);

        let suggestions = columns
            .iter()
            .map(|c| {
                suggest_options(
                    &c.header,
                    &options,
                    import_config.max_suggestions,
                    import_config.min_suggestion_score,
                )
            })
            .collect();

        let mut dropdowns = DropdownRegistry::new();
        let selectors = columns
            .iter()
            .map(|c| ColumnFieldSelect::new(c.index, &mut dropdowns))
            .collect();

        let mut matches = ColumnMatches::new(columns);
        let mut status = None;
        if import_config.auto_match {
            let matched = matches.auto_match(&options);
            if matched > 0 {
                status = Some(format!("Matched {} columns by name", matched));
            }
        }

        Self {
            object,
            fields,
            options,
            matches,
            suggestions,
            selectors,
            dropdowns,
            cursor: 0,
            confirmed: false,
            status,
        }
    }

    /// Position of the selector whose dropdown is open
    pub fn open_selector(&self) -> Option<usize> {
        let handle = self.dropdowns.open_handle()?;
        self.selectors.iter().position(|s| s.dropdown() == handle)
    }

    pub fn context(&self, idx: usize) -> SelectContext<'_> {
        SelectContext {
            fields: &self.fields,
            options: &self.options,
            suggested_options: self.suggestions.get(idx).map(|s| s.as_slice()).unwrap_or(&[]),
        }
    }
}
