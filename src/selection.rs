use crate::model::Side;

/// The pair of fighter ids bound in the search view, encoded as `id1/id2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionState {
    ids: [Option<u32>; 2],
}

impl SelectionState {
    pub fn new(red: Option<u32>, blue: Option<u32>) -> Self {
        Self { ids: [red, blue] }
    }

    /// Reads `#id1/id2`. Segments that are missing, non-numeric or not positive are
    /// left unset; segments past the second are ignored.
    pub fn parse_fragment(raw: &str) -> Self {
        let body = raw.trim();
        let body = body.strip_prefix('#').unwrap_or(body);
        let mut ids = [None, None];
        for (slot, segment) in ids.iter_mut().zip(body.split('/')) {
            *slot = parse_id(segment);
        }
        Self { ids }
    }

    pub fn get(&self, side: Side) -> Option<u32> {
        self.ids[side.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.ids.iter().all(Option::is_none)
    }

    /// Ids to fetch on startup, red first.
    pub fn restore_targets(&self) -> Vec<(Side, u32)> {
        Side::ALL
            .iter()
            .filter_map(|side| self.get(*side).map(|id| (*side, id)))
            .collect()
    }

    /// `id1/id2` without the leading `#`; an unset slot is an empty segment.
    pub fn to_fragment(&self) -> String {
        let segment = |id: Option<u32>| id.map(|id| id.to_string()).unwrap_or_default();
        format!("{}/{}", segment(self.ids[0]), segment(self.ids[1]))
    }

    pub fn share_url(&self, base_url: &str) -> String {
        format!(
            "{}/search#{}",
            base_url.trim_end_matches('/'),
            self.to_fragment()
        )
    }
}

fn parse_id(segment: &str) -> Option<u32> {
    let value = segment.trim().parse::<i64>().ok()?;
    if value <= 0 {
        return None;
    }
    u32::try_from(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_slots() {
        let sel = SelectionState::parse_fragment("#3/7");
        assert_eq!(sel.get(Side::Red), Some(3));
        assert_eq!(sel.get(Side::Blue), Some(7));
        assert_eq!(sel.restore_targets(), vec![(Side::Red, 3), (Side::Blue, 7)]);
    }

    #[test]
    fn trailing_empty_segment_restores_only_red() {
        let sel = SelectionState::parse_fragment("#3/");
        assert_eq!(sel.restore_targets(), vec![(Side::Red, 3)]);
    }

    #[test]
    fn bad_segments_are_skipped() {
        let sel = SelectionState::parse_fragment("#abc/-4");
        assert!(sel.is_empty());
        let sel = SelectionState::parse_fragment("#0/12");
        assert_eq!(sel.restore_targets(), vec![(Side::Blue, 12)]);
        assert!(SelectionState::parse_fragment("").is_empty());
        assert!(SelectionState::parse_fragment("#").is_empty());
    }

    #[test]
    fn fragment_keeps_empty_segments() {
        assert_eq!(SelectionState::new(Some(3), None).to_fragment(), "3/");
        assert_eq!(SelectionState::new(None, Some(7)).to_fragment(), "/7");
        assert_eq!(SelectionState::new(Some(3), Some(7)).to_fragment(), "3/7");
    }

    #[test]
    fn share_url_appends_fragment() {
        let sel = SelectionState::new(Some(3), Some(7));
        assert_eq!(
            sel.share_url("http://localhost:9000/"),
            "http://localhost:9000/search#3/7"
        );
    }
}
