//! In-memory store tests.

use crate::activity::ActivityType;
use crate::group::{self, NewGroup};
use crate::ids::AccountId;
use crate::member::{Member, NewMember};
use crate::party::{self, NewParty};
use crate::snapshot::RosterSnapshot;

use super::{MemoryStore, RosterStore};

fn sample_snapshot() -> RosterSnapshot {
    let mut snapshot = RosterSnapshot::new();
    let group_id = group::create(&mut snapshot, NewGroup::named("g", ActivityType::Offense));
    let mut spec = NewParty::named("p", ActivityType::Offense);
    spec.group_id = Some(group_id);
    party::create(&mut snapshot, spec).expect("create party");
    let member = Member::new(NewMember {
        name: "aria".to_string(),
        ..NewMember::default()
    });
    snapshot.members.insert(member.id.clone(), member);
    snapshot
}

#[test]
fn unknown_account_loads_empty() {
    let store = MemoryStore::new();
    let account = AccountId::new("acct-1");
    let snapshot = store.load_snapshot(&account).expect("load");
    assert!(snapshot.groups.is_empty());
    assert!(snapshot.parties.is_empty());
    assert!(snapshot.members.is_empty());
}

#[test]
fn snapshot_round_trips() {
    let store = MemoryStore::new();
    let account = AccountId::new("acct-1");
    let snapshot = sample_snapshot();

    store.save_snapshot(&account, &snapshot).expect("save");
    let loaded = store.load_snapshot(&account).expect("load");
    assert_eq!(loaded, snapshot);
}

#[test]
fn accounts_are_isolated() {
    let store = MemoryStore::new();
    let first = AccountId::new("acct-1");
    let second = AccountId::new("acct-2");

    store
        .save_snapshot(&first, &sample_snapshot())
        .expect("save first");
    let other = store.load_snapshot(&second).expect("load second");
    assert!(other.groups.is_empty());
}

#[test]
fn save_replaces_previous_lists() {
    let store = MemoryStore::new();
    let account = AccountId::new("acct-1");
    store
        .save_snapshot(&account, &sample_snapshot())
        .expect("save populated");
    store
        .save_snapshot(&account, &RosterSnapshot::new())
        .expect("save empty");
    let loaded = store.load_snapshot(&account).expect("load");
    assert!(loaded.groups.is_empty());
    assert!(loaded.members.is_empty());
}
