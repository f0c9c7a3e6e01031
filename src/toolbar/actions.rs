#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    CopyToClipboard,
    SaveAs,
    Popout,
    Adjust,
    Filter,
    SendToCanvas,
    Hide,
}

impl ToolbarAction {
    /// Display order, left to right.
    pub const ALL: [ToolbarAction; 7] = [
        Self::CopyToClipboard,
        Self::SaveAs,
        Self::Popout,
        Self::Adjust,
        Self::Filter,
        Self::SendToCanvas,
        Self::Hide,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::CopyToClipboard => "Copy to Clipboard",
            Self::SaveAs => "Save As",
            Self::Popout => "Popout Image",
            Self::Adjust => "Adjust Image",
            Self::Filter => "Filter Image",
            Self::SendToCanvas => "Edit Image",
            Self::Hide => "Hide Image",
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::CopyToClipboard => "fa-solid fa-clipboard",
            Self::SaveAs => "fa-solid fa-floppy-disk",
            Self::Popout => "fa-solid fa-arrow-up-right-from-square",
            Self::Adjust => "fa-solid fa-sliders",
            Self::Filter => "fa-solid fa-wand-magic-sparkles",
            Self::SendToCanvas => "fa-solid fa-pen-to-square",
            Self::Hide => "fa-solid fa-eye-slash",
        }
    }

    pub const fn requires_clipboard(self) -> bool {
        matches!(self, Self::CopyToClipboard)
    }

    /// Actions a host with the given capabilities can offer.
    pub fn available(clipboard: bool) -> impl Iterator<Item = ToolbarAction> {
        Self::ALL
            .into_iter()
            .filter(move |action| clipboard || !action.requires_clipboard())
    }
}
