//! # Eligibility
//!
//! Per-user grants derived from a merged view. Deterministic: the only time
//! dependence is `view.is_live`, fixed when the view was built.

use super::merge::CampaignMergedView;
use serde::Serialize;
use shared_types::{Address, CampaignStatus, PriorMarkers, VoteOption};
use std::fmt;

/// User-facing status label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum StatusLabel {
    Created,
    Active,
    Live,
    Approved,
    Ended,
    Invalid,
    Deleted,
}

impl StatusLabel {
    pub fn of(view: &CampaignMergedView) -> Self {
        if view.deleted {
            return StatusLabel::Deleted;
        }
        if view.invalid {
            return StatusLabel::Invalid;
        }
        match view.status {
            CampaignStatus::Created => StatusLabel::Created,
            CampaignStatus::Active => StatusLabel::Active,
            CampaignStatus::Live if view.is_live => StatusLabel::Live,
            CampaignStatus::Live | CampaignStatus::Ended => StatusLabel::Ended,
            CampaignStatus::Approved => StatusLabel::Approved,
        }
    }
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Eligibility {
    pub is_votable: bool,
    pub is_likeable: bool,
    pub label: StatusLabel,
    /// Option the user already voted, if any.
    pub voted_option: Option<VoteOption>,
}

/// Compute what `user` may do with the campaign behind `view`.
///
/// `prior` must hold the markers of `user` on this campaign. Anonymous
/// callers get no grants.
pub fn eligibility(
    view: &CampaignMergedView,
    user: Option<&Address>,
    prior: &PriorMarkers,
) -> Eligibility {
    let label = StatusLabel::of(view);
    if user.map_or(true, Address::is_empty) {
        return Eligibility {
            is_votable: false,
            is_likeable: false,
            label,
            voted_option: None,
        };
    };

    Eligibility {
        is_votable: view.is_live && !view.invalid && !view.deleted && prior.vote.is_none(),
        is_likeable: !view.deleted && prior.like.is_none(),
        label,
        voted_option: prior.voted_option(),
    }
}
