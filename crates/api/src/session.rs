use state::model::Selection;

/// Identifies the selection a detail fetch was issued for.
///
/// Tickets are compared by selection identity, never by issue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailTicket(Option<Selection>);

/// Supersession gate for selection-keyed detail fetches.
///
/// When the selection changes before an in-flight fetch resolves, its
/// result must be discarded. The gate tracks the current selection;
/// [`DetailGate::begin`] issues a ticket for a fetch and
/// [`DetailGate::accepts`] decides, at resolution time, whether the result
/// still belongs to the current selection.
#[derive(Debug, Default)]
pub struct DetailGate {
    current: Option<Selection>,
}

impl DetailGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Selection> {
        self.current.as_ref()
    }

    /// Records `selection` as current and issues a ticket for the fetch
    /// about to start.
    pub fn begin(&mut self, selection: Option<Selection>) -> DetailTicket {
        self.current = selection.clone();
        DetailTicket(selection)
    }

    /// True when the ticket's selection is still the current one.
    pub fn accepts(&self, ticket: &DetailTicket) -> bool {
        self.current == ticket.0
    }
}

#[cfg(test)]
mod tests {
    use super::DetailGate;
    use state::model::{BuildingSource, Selection, Track};

    #[test]
    fn stale_ticket_is_rejected_after_selection_change() {
        let mut gate = DetailGate::new();
        let first = gate.begin(Some(Selection::point("P1", Some(Track::T44))));
        let second = gate.begin(Some(Selection::building(BuildingSource::Gba, "b1")));

        assert!(!gate.accepts(&first));
        assert!(gate.accepts(&second));
    }

    #[test]
    fn identity_wins_over_issue_order() {
        let mut gate = DetailGate::new();
        let early = gate.begin(Some(Selection::point("P1", None)));
        // A refetch for the same selection supersedes nothing: the earlier
        // in-flight result is still for the current selection.
        let late = gate.begin(Some(Selection::point("P1", None)));

        assert!(gate.accepts(&early));
        assert!(gate.accepts(&late));
    }

    #[test]
    fn clearing_the_selection_discards_everything_in_flight() {
        let mut gate = DetailGate::new();
        let ticket = gate.begin(Some(Selection::point("P1", None)));
        let cleared = gate.begin(None);

        assert!(!gate.accepts(&ticket));
        assert!(gate.accepts(&cleared));
    }
}
