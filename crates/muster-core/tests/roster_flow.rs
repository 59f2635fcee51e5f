//! End-to-end roster scenarios through the service and the in-memory
//! store: every mutation runs the full load / mutate / persist bracket.

use muster_core::bootstrap::BootstrapLayout;
use muster_core::group::{GroupError, NewGroup};
use muster_core::member::NewMember;
use muster_core::party::{NewParty, PartyError};
use muster_core::{
    AccountId, ActivityType, AssignRequest, DeclaredPosition, MemberId, MemoryStore, RosterError,
    RosterService, SwapRequest,
};

fn service() -> RosterService<MemoryStore> {
    RosterService::new(MemoryStore::new())
}

fn account() -> AccountId {
    AccountId::new("guild-1")
}

fn register(service: &RosterService<MemoryStore>, account: &AccountId, name: &str) -> MemberId {
    service
        .register_member(
            account,
            NewMember {
                name: name.to_string(),
                id: Some(MemberId::new(name)),
                ..NewMember::default()
            },
        )
        .expect("register member")
        .id
}

#[test]
fn bootstrap_then_place_and_lead() {
    let service = service();
    let account = account();

    let report = service
        .bootstrap_defaults(&account, &BootstrapLayout::default())
        .expect("bootstrap");
    assert_eq!(report.parties_created, 40);

    let offense_groups = service
        .list_groups(&account, Some(ActivityType::Offense))
        .expect("list groups");
    assert_eq!(offense_groups.len(), 4);
    let party_id = offense_groups[0].party_ids[0].clone();

    let member = register(&service, &account, "aria");
    let outcome = service
        .assign(
            &account,
            AssignRequest {
                member_id: member.clone(),
                party_id: party_id.clone(),
                activity: ActivityType::Offense,
                slot: Some(0),
                as_leader: true,
            },
        )
        .expect("assign leader");
    assert!(outcome.is_leader);

    let view = service
        .get_party_with_members(&account, &party_id)
        .expect("resolve party");
    assert_eq!(view.party.leader(), Some(&member));
    assert_eq!(view.leader.as_ref().map(|m| m.id.clone()), Some(member));
}

#[test]
fn leader_displacement_is_reported_and_cleans_up() {
    let service = service();
    let account = account();
    let party = service
        .create_party(&account, NewParty::named("p", ActivityType::Offense))
        .expect("create party");
    let old_leader = register(&service, &account, "old");
    let new_leader = register(&service, &account, "new");

    service
        .assign(
            &account,
            AssignRequest {
                member_id: old_leader.clone(),
                party_id: party.id.clone(),
                activity: ActivityType::Offense,
                slot: None,
                as_leader: true,
            },
        )
        .expect("seat old leader");
    let outcome = service
        .assign(
            &account,
            AssignRequest {
                member_id: new_leader.clone(),
                party_id: party.id.clone(),
                activity: ActivityType::Offense,
                slot: Some(0),
                as_leader: true,
            },
        )
        .expect("displace");

    assert_eq!(outcome.displaced, Some(old_leader.clone()));
    let members = service.list_members(&account).expect("list members");
    let old_record = members
        .iter()
        .find(|m| m.id == old_leader)
        .expect("old leader record");
    assert!(old_record.assignment(ActivityType::Offense).is_none());
}

#[test]
fn swap_round_trips_across_service_calls() {
    let service = service();
    let account = account();
    let p1 = service
        .create_party(&account, NewParty::named("p1", ActivityType::Offense))
        .expect("create p1");
    let p2 = service
        .create_party(&account, NewParty::named("p2", ActivityType::Offense))
        .expect("create p2");
    let a = register(&service, &account, "a");
    let b = register(&service, &account, "b");

    for (member, party, slot) in [(&a, &p1, 1), (&b, &p2, 0)] {
        service
            .assign(
                &account,
                AssignRequest {
                    member_id: member.clone(),
                    party_id: party.id.clone(),
                    activity: ActivityType::Offense,
                    slot: Some(slot),
                    as_leader: false,
                },
            )
            .expect("place");
    }

    let request = SwapRequest {
        first: DeclaredPosition {
            member_id: a.clone(),
            party_id: p1.id.clone(),
            slot: 1,
        },
        second: DeclaredPosition {
            member_id: b.clone(),
            party_id: p2.id.clone(),
            slot: 0,
        },
        activity: ActivityType::Offense,
    };
    let outcome = service.swap(&account, request).expect("swap");
    assert!(outcome.first.is_leader);

    // Swapping back with the new positions restores the original layout.
    let inverse = SwapRequest {
        first: DeclaredPosition {
            member_id: a.clone(),
            party_id: p2.id.clone(),
            slot: 0,
        },
        second: DeclaredPosition {
            member_id: b.clone(),
            party_id: p1.id.clone(),
            slot: 1,
        },
        activity: ActivityType::Offense,
    };
    service.swap(&account, inverse).expect("swap back");

    let view = service
        .get_party_with_members(&account, &p1.id)
        .expect("resolve p1");
    assert_eq!(view.party.slots[1], Some(a));
}

#[test]
fn stale_swap_declaration_fails_without_mutating() {
    let service = service();
    let account = account();
    let p1 = service
        .create_party(&account, NewParty::named("p1", ActivityType::Offense))
        .expect("create p1");
    let a = register(&service, &account, "a");
    let b = register(&service, &account, "b");
    for member in [&a, &b] {
        service
            .assign(
                &account,
                AssignRequest {
                    member_id: member.clone(),
                    party_id: p1.id.clone(),
                    activity: ActivityType::Offense,
                    slot: None,
                    as_leader: false,
                },
            )
            .expect("place");
    }

    let err = service
        .swap(
            &account,
            SwapRequest {
                first: DeclaredPosition {
                    member_id: a.clone(),
                    party_id: p1.id.clone(),
                    slot: 4, // stale: a sits at slot 1
                },
                second: DeclaredPosition {
                    member_id: b.clone(),
                    party_id: p1.id.clone(),
                    slot: 2,
                },
                activity: ActivityType::Offense,
            },
        )
        .expect_err("stale declaration");
    assert!(matches!(
        err,
        RosterError::Assign(muster_core::assignment::AssignError::PositionConflict { .. })
    ));

    let view = service
        .get_party_with_members(&account, &p1.id)
        .expect("resolve");
    assert_eq!(view.party.slots[1], Some(a));
    assert_eq!(view.party.slots[2], Some(b));
}

#[test]
fn group_delete_cascades_to_parties_and_assignments() {
    let service = service();
    let account = account();
    let group = service
        .create_group(&account, NewGroup::named("g", ActivityType::Offense))
        .expect("create group");
    let mut p1_spec = NewParty::named("p1", ActivityType::Offense);
    p1_spec.group_id = Some(group.id.clone());
    let mut p2_spec = NewParty::named("p2", ActivityType::Offense);
    p2_spec.group_id = Some(group.id.clone());
    let p1 = service.create_party(&account, p1_spec).expect("create p1");
    let p2 = service.create_party(&account, p2_spec).expect("create p2");

    let m = register(&service, &account, "m");
    service
        .assign(
            &account,
            AssignRequest {
                member_id: m.clone(),
                party_id: p2.id.clone(),
                activity: ActivityType::Offense,
                slot: None,
                as_leader: false,
            },
        )
        .expect("place");

    service.delete_group(&account, &group.id).expect("delete");

    for party_id in [&p1.id, &p2.id] {
        let err = service
            .get_party_with_members(&account, party_id)
            .expect_err("party deleted");
        assert!(matches!(
            err,
            RosterError::Party(PartyError::NotFound { .. })
        ));
    }
    let members = service.list_members(&account).expect("list");
    let record = members.iter().find(|r| r.id == m).expect("member survives");
    assert!(record.assignment(ActivityType::Offense).is_none());

    let err = service
        .delete_group(&account, &group.id)
        .expect_err("already gone");
    assert!(matches!(err, RosterError::Group(GroupError::NotFound { .. })));
}

#[test]
fn sixth_party_in_group_is_rejected_and_group_unchanged() {
    let service = service();
    let account = account();
    let group = service
        .create_group(&account, NewGroup::named("g", ActivityType::Offense))
        .expect("create group");
    for i in 0..5 {
        let mut spec = NewParty::named(format!("p{i}"), ActivityType::Offense);
        spec.group_id = Some(group.id.clone());
        service.create_party(&account, spec).expect("within cap");
    }

    let mut sixth = NewParty::named("p5", ActivityType::Offense);
    sixth.group_id = Some(group.id.clone());
    let err = service.create_party(&account, sixth).expect_err("cap hit");
    assert!(matches!(
        err,
        RosterError::Party(PartyError::GroupFull { .. })
    ));

    let reloaded = service.get_group(&account, &group.id).expect("reload");
    assert_eq!(reloaded.party_ids.len(), 5);
}

#[test]
fn accounts_do_not_bleed_into_each_other() {
    let service = service();
    let first = AccountId::new("guild-1");
    let second = AccountId::new("guild-2");

    service
        .create_group(&first, NewGroup::named("g", ActivityType::Offense))
        .expect("create in first");

    assert!(service
        .list_groups(&second, None)
        .expect("list second")
        .is_empty());
}

#[test]
fn removing_member_clears_both_activity_placements() {
    let service = service();
    let account = account();
    let off = service
        .create_party(&account, NewParty::named("off", ActivityType::Offense))
        .expect("create offense party");
    let def = service
        .create_party(&account, NewParty::named("def", ActivityType::Defense))
        .expect("create defense party");
    let m = register(&service, &account, "m");
    for (party, activity) in [(&off, ActivityType::Offense), (&def, ActivityType::Defense)] {
        service
            .assign(
                &account,
                AssignRequest {
                    member_id: m.clone(),
                    party_id: party.id.clone(),
                    activity,
                    slot: None,
                    as_leader: false,
                },
            )
            .expect("place");
    }

    service.remove_member(&account, &m).expect("remove member");

    for party in [&off, &def] {
        let view = service
            .get_party_with_members(&account, &party.id)
            .expect("resolve");
        assert_eq!(view.party.occupied_count(), 0);
    }
    assert!(service
        .list_members(&account)
        .expect("list")
        .iter()
        .all(|r| r.id != m));
}

#[test]
fn clear_all_via_service_reports_count() {
    let service = service();
    let account = account();
    let p = service
        .create_party(&account, NewParty::named("p", ActivityType::Offense))
        .expect("create party");
    for name in ["a", "b", "c"] {
        let m = register(&service, &account, name);
        service
            .assign(
                &account,
                AssignRequest {
                    member_id: m,
                    party_id: p.id.clone(),
                    activity: ActivityType::Offense,
                    slot: None,
                    as_leader: false,
                },
            )
            .expect("place");
    }

    let cleared = service
        .clear_all(&account, ActivityType::Offense)
        .expect("clear");
    assert_eq!(cleared, 3);
    let view = service
        .get_party_with_members(&account, &p.id)
        .expect("resolve");
    assert_eq!(view.party.occupied_count(), 0);
}
