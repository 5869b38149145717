#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Previous,
    Page,
    Next,
}

/// A button in the pagination strip and the page it loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageControl {
    pub kind: ControlKind,
    pub label: String,
    pub target: u32,
    pub is_current: bool,
}

impl PageControl {
    fn previous(target: u32) -> Self {
        Self {
            kind: ControlKind::Previous,
            label: "Previous".to_string(),
            target,
            is_current: false,
        }
    }

    fn page(target: u32, is_current: bool) -> Self {
        Self {
            kind: ControlKind::Page,
            label: target.to_string(),
            target,
            is_current,
        }
    }

    fn next(target: u32) -> Self {
        Self {
            kind: ControlKind::Next,
            label: "Next".to_string(),
            target,
            is_current: false,
        }
    }
}

/// Builds the strip for a page the server reported.
///
/// "Previous" only when `current_page > 1`, one numbered control per page in
/// `1..=total_pages`, "Next" only when `current_page < total_pages`. A
/// `total_pages` of zero (no persisted history) yields an empty strip.
pub fn page_controls(current_page: u32, total_pages: u32) -> Vec<PageControl> {
    let mut controls = Vec::with_capacity(total_pages as usize + 2);

    if current_page > 1 {
        controls.push(PageControl::previous(current_page - 1));
    }

    controls.extend((1..=total_pages).map(|page| PageControl::page(page, page == current_page)));

    if current_page < total_pages {
        controls.push(PageControl::next(current_page + 1));
    }

    controls
}
