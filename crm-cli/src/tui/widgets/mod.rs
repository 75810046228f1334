pub mod column_field_select;
pub mod inline_cell;
pub mod text_input;

pub use column_field_select::{
    ColumnFieldSelect, ColumnSelectEvent, SelectContext, SelectRow, SelectorView,
};
pub use inline_cell::{
    FieldContext, FieldFocus, InlineCell, InlineCellContainer, InlineCellProps, InlineCellView,
    PendingTooltip,
};
pub use text_input::TextInputState;
