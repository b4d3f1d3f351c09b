/// Panel toggles that only affect what egui draws, never the session.
pub struct UiState {
    pub show_memo_list: bool,
    pub show_help: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            show_memo_list: true,
            show_help: true,
        }
    }
}
