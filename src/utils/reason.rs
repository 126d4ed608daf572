/// Why a user opened a ticket, as picked from the `ticket_reason` menu.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TicketReason {
    Report,
    Giveaway,
    Support,
    Unknown,
}

impl TicketReason {
    /// Reasons offered in the creation menu, in display order.
    pub const MENU: [TicketReason; 3] = [Self::Report, Self::Giveaway, Self::Support];

    pub fn from_id(id: &str) -> Self {
        match id {
            "report" => Self::Report,
            "giveaway" => Self::Giveaway,
            "support" => Self::Support,
            _ => Self::Unknown,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Report => "report",
            Self::Giveaway => "giveaway",
            Self::Support => "support",
            Self::Unknown => "unknown",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Report => "Report a Player",
            Self::Giveaway => "Won a Giveaway",
            Self::Support => "General Support",
            Self::Unknown => "Unknown",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Report => "Report a player who broke the rules",
            Self::Giveaway => "Claim a prize you won in a giveaway",
            Self::Support => "Ask the staff team for help",
            Self::Unknown => "",
        }
    }

    /// Label as it appears in channel names, e.g. `won-a-giveaway`.
    pub fn slug(&self) -> String {
        self.label().to_lowercase().replace(' ', "-")
    }
}

impl std::fmt::Display for TicketReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_ids_map_to_labels() {
        assert_eq!(TicketReason::from_id("report").label(), "Report a Player");
        assert_eq!(TicketReason::from_id("giveaway").label(), "Won a Giveaway");
        assert_eq!(TicketReason::from_id("support").label(), "General Support");
    }

    #[test]
    fn test_unknown_id_maps_to_unknown_label() {
        assert_eq!(TicketReason::from_id("refund").label(), "Unknown");
        assert_eq!(TicketReason::from_id("").label(), "Unknown");
        assert_eq!(TicketReason::from_id("Giveaway"), TicketReason::Unknown);
    }

    #[test]
    fn test_slug() {
        assert_eq!(TicketReason::Giveaway.slug(), "won-a-giveaway");
        assert_eq!(TicketReason::Unknown.slug(), "unknown");
    }

    #[test]
    fn test_menu_ids_round_trip() {
        for reason in TicketReason::MENU {
            assert_eq!(TicketReason::from_id(reason.id()), reason);
        }
    }
}
