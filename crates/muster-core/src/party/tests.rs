//! Party registry tests.

use crate::activity::ActivityType;
use crate::group::{self, NewGroup, MAX_PARTIES_PER_GROUP};
use crate::ids::{GroupId, MemberId, PartyId};
use crate::member::{Member, NewMember};
use crate::party::{self, NewParty, PartyError, PartyPatch};
use crate::snapshot::RosterSnapshot;

fn register(snapshot: &mut RosterSnapshot, name: &str) -> MemberId {
    let member = Member::new(NewMember {
        name: name.to_string(),
        id: Some(MemberId::new(name)),
        ..NewMember::default()
    });
    let id = member.id.clone();
    snapshot.members.insert(id.clone(), member);
    id
}

fn grouped_spec(name: &str, snapshot: &mut RosterSnapshot) -> (NewParty, GroupId) {
    let group_id = group::create(snapshot, NewGroup::named("g", ActivityType::Offense));
    let mut spec = NewParty::named(name, ActivityType::Offense);
    spec.group_id = Some(group_id.clone());
    (spec, group_id)
}

#[test]
fn create_links_party_to_group() {
    let mut snapshot = RosterSnapshot::new();
    let (spec, group_id) = grouped_spec("p", &mut snapshot);
    let party_id = party::create(&mut snapshot, spec).expect("create");

    let group = snapshot.groups.get(&group_id).expect("group");
    assert_eq!(group.party_ids, vec![party_id.clone()]);
    let created = snapshot.parties.get(&party_id).expect("party");
    assert_eq!(created.group_id.as_ref(), Some(&group_id));
    assert_eq!(created.occupied_count(), 0);
}

#[test]
fn create_rejects_sixth_party_in_group() {
    let mut snapshot = RosterSnapshot::new();
    let group_id = group::create(&mut snapshot, NewGroup::named("g", ActivityType::Offense));
    for i in 0..MAX_PARTIES_PER_GROUP {
        let mut spec = NewParty::named(format!("p{i}"), ActivityType::Offense);
        spec.group_id = Some(group_id.clone());
        party::create(&mut snapshot, spec).expect("create under cap");
    }

    let mut sixth = NewParty::named("p6", ActivityType::Offense);
    sixth.group_id = Some(group_id.clone());
    let err = party::create(&mut snapshot, sixth).expect_err("over cap");
    assert!(matches!(err, PartyError::GroupFull { .. }));

    let group = snapshot.groups.get(&group_id).expect("group");
    assert_eq!(group.party_ids.len(), MAX_PARTIES_PER_GROUP);
}

#[test]
fn create_rejects_oversized_slot_vector() {
    let mut snapshot = RosterSnapshot::new();
    let mut spec = NewParty::named("p", ActivityType::Offense);
    spec.slots = Some(vec![None; 6]);
    let err = party::create(&mut snapshot, spec).expect_err("six entries");
    assert!(matches!(
        err,
        PartyError::TooManySlots {
            provided: 6,
            limit: 5
        }
    ));
}

#[test]
fn create_pads_short_slot_vector() {
    let mut snapshot = RosterSnapshot::new();
    let m = register(&mut snapshot, "m");
    let mut spec = NewParty::named("p", ActivityType::Offense);
    spec.slots = Some(vec![Some(m.clone()), None]);
    let party_id = party::create(&mut snapshot, spec).expect("create");
    let created = snapshot.parties.get(&party_id).expect("party");
    assert_eq!(created.slots.len(), 5);
    assert_eq!(created.leader(), Some(&m));
}

#[test]
fn create_with_slots_places_members() {
    let mut snapshot = RosterSnapshot::new();
    let m1 = register(&mut snapshot, "m1");
    let m2 = register(&mut snapshot, "m2");

    let mut first = NewParty::named("first", ActivityType::Offense);
    first.slots = Some(vec![None, Some(m1.clone())]);
    let first_id = party::create(&mut snapshot, first).expect("create first");

    // m1 reappearing in a second party's import must vacate the first.
    let mut second = NewParty::named("second", ActivityType::Offense);
    second.slots = Some(vec![Some(m2.clone()), Some(m1.clone())]);
    let second_id = party::create(&mut snapshot, second).expect("create second");

    let first_party = snapshot.parties.get(&first_id).expect("first");
    assert_eq!(first_party.occupied_count(), 0);
    let second_party = snapshot.parties.get(&second_id).expect("second");
    assert_eq!(second_party.slot_of(&m1), Some(1));
    assert_eq!(second_party.leader(), Some(&m2));

    let m1_ref = snapshot
        .members
        .get(&m1)
        .and_then(|m| m.assignment(ActivityType::Offense))
        .expect("m1 back-reference");
    assert_eq!(m1_ref.party_id, second_id);
    assert!(!m1_ref.is_leader);
    snapshot.verify_invariants().expect("invariants hold");
}

#[test]
fn create_drops_duplicate_member_entries() {
    let mut snapshot = RosterSnapshot::new();
    let m = register(&mut snapshot, "m");
    let mut spec = NewParty::named("p", ActivityType::Offense);
    spec.slots = Some(vec![Some(m.clone()), Some(m.clone()), Some(m.clone())]);
    let party_id = party::create(&mut snapshot, spec).expect("create");
    let created = snapshot.parties.get(&party_id).expect("party");
    assert_eq!(created.occupied_count(), 1);
    assert_eq!(created.slot_of(&m), Some(0));
    snapshot.verify_invariants().expect("invariants hold");
}

#[test]
fn update_unknown_party_is_not_found() {
    let mut snapshot = RosterSnapshot::new();
    let err = party::update(
        &mut snapshot,
        &PartyId::new("missing"),
        PartyPatch::default(),
    )
    .expect_err("unknown id");
    assert!(matches!(err, PartyError::NotFound { .. }));
}

#[test]
fn update_slots_clears_dropped_members() {
    let mut snapshot = RosterSnapshot::new();
    let m1 = register(&mut snapshot, "m1");
    let m2 = register(&mut snapshot, "m2");
    let mut spec = NewParty::named("p", ActivityType::Offense);
    spec.slots = Some(vec![Some(m1.clone()), Some(m2.clone())]);
    let party_id = party::create(&mut snapshot, spec).expect("create");

    party::update(
        &mut snapshot,
        &party_id,
        PartyPatch {
            name: None,
            slots: Some(vec![Some(m2.clone())]),
        },
    )
    .expect("replace occupancy");

    let updated = snapshot.parties.get(&party_id).expect("party");
    assert_eq!(updated.leader(), Some(&m2));
    assert_eq!(updated.occupied_count(), 1);
    let m1_record = snapshot.members.get(&m1).expect("m1");
    assert!(m1_record.assignment(ActivityType::Offense).is_none());
    let m2_ref = snapshot
        .members
        .get(&m2)
        .and_then(|m| m.assignment(ActivityType::Offense))
        .expect("m2 back-reference");
    assert!(m2_ref.is_leader);
    snapshot.verify_invariants().expect("invariants hold");
}

#[test]
fn delete_unlinks_group_and_clears_assignments() {
    let mut snapshot = RosterSnapshot::new();
    let m = register(&mut snapshot, "m");
    let (mut spec, group_id) = grouped_spec("p", &mut snapshot);
    spec.slots = Some(vec![Some(m.clone())]);
    let party_id = party::create(&mut snapshot, spec).expect("create");

    party::delete(&mut snapshot, &party_id).expect("delete");

    assert!(!snapshot.parties.contains_key(&party_id));
    let group = snapshot.groups.get(&group_id).expect("group survives");
    assert!(group.party_ids.is_empty());
    let member = snapshot.members.get(&m).expect("member survives");
    assert!(member.assignment(ActivityType::Offense).is_none());
}

#[test]
fn get_with_members_resolves_records_and_leader() {
    let mut snapshot = RosterSnapshot::new();
    let m1 = register(&mut snapshot, "m1");
    let mut spec = NewParty::named("p", ActivityType::Offense);
    spec.slots = Some(vec![
        Some(m1.clone()),
        Some(MemberId::new("ghost")), // slot reference with no record
    ]);
    let party_id = party::create(&mut snapshot, spec).expect("create");

    let view = party::get_with_members(&snapshot, &party_id).expect("resolve");
    assert_eq!(view.leader.as_ref().map(|m| &m.id), Some(&m1));
    assert!(view.members[0].is_some());
    assert!(view.members[1].is_none());
    let resolved = view.resolved_slots();
    assert_eq!(resolved.len(), 2);
    assert_eq!(resolved[1].member_id, MemberId::new("ghost"));
    assert!(resolved[1].member.is_none());
}

#[test]
fn get_with_members_unknown_party_is_not_found() {
    let snapshot = RosterSnapshot::new();
    let err = party::get_with_members(&snapshot, &PartyId::new("missing")).expect_err("unknown");
    assert!(matches!(err, PartyError::NotFound { .. }));
}
