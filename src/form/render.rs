use serde::Serialize;

/// Everything the rendering layer needs to draw one field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderDecision {
    pub visible: bool,
    pub disabled: bool,
    /// Hidden, but the layout keeps its slot.
    pub reserve_space: bool,
    /// Error to display, already gated on touched/submitted state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
