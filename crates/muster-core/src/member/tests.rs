use crate::activity::ActivityType;
use crate::ids::{MemberId, PartyId};

use super::{AssignmentRef, Member, MemberPatch, NewMember};

fn member(name: &str) -> Member {
    Member::new(NewMember {
        name: name.to_string(),
        ..NewMember::default()
    })
}

#[test]
fn new_member_has_no_assignments() {
    let m = member("aria");
    assert!(m.assignments.is_empty());
    assert_eq!(m.name, "aria");
}

#[test]
fn explicit_id_is_kept() {
    let m = Member::new(NewMember {
        name: "aria".to_string(),
        id: Some(MemberId::new("m-1")),
        ..NewMember::default()
    });
    assert_eq!(m.id, MemberId::new("m-1"));
}

#[test]
fn assignments_are_independent_per_activity() {
    let mut m = member("aria");
    m.set_assignment(
        ActivityType::Offense,
        AssignmentRef {
            party_id: PartyId::new("p-1"),
            is_leader: true,
        },
    );
    m.set_assignment(
        ActivityType::Defense,
        AssignmentRef {
            party_id: PartyId::new("p-2"),
            is_leader: false,
        },
    );

    assert_eq!(m.assignments.len(), 2);
    let cleared = m.clear_assignment(ActivityType::Offense);
    assert_eq!(cleared.map(|a| a.party_id), Some(PartyId::new("p-1")));
    assert!(m.assignment(ActivityType::Offense).is_none());
    assert!(m.assignment(ActivityType::Defense).is_some());
}

#[test]
fn clear_absent_assignment_is_a_noop() {
    let mut m = member("aria");
    assert!(m.clear_assignment(ActivityType::Defense).is_none());
}

#[test]
fn patch_leaves_unset_fields_alone() {
    let mut m = member("aria");
    m.apply_patch(MemberPatch {
        level: Some(61),
        ..MemberPatch::default()
    });
    assert_eq!(m.name, "aria");
    assert_eq!(m.level, Some(61));
    assert!(m.note.is_none());
}
