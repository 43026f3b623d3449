use super::*;

pub mod adopt_leader;
pub mod announce_view;
pub mod apply_new_view;
pub mod commit;
pub mod finish_reconciliation;
pub mod propose;
pub mod receive_ack;
pub mod receive_new_leader;
pub mod receive_recovery;
pub mod receive_request;
pub mod remind_reporters;
pub mod suspect_member;
