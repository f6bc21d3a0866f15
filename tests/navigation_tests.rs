use lms_portal::{
    expansion::ExpansionState,
    models::{NavEntryView, Role},
    navigation::{self, NavEntry, entries, find_entry, render, slugify, tree_for},
    registry::{RouteRegistry, default_path_for},
};
use std::collections::HashSet;

fn find_view<'a>(items: &'a [NavEntryView], name: &str) -> Option<&'a NavEntryView> {
    items.iter().find_map(|item| {
        if item.name == name {
            Some(item)
        } else {
            find_view(&item.children, name)
        }
    })
}

fn entry_named(role: Role, name: &str) -> &'static NavEntry {
    entries(role)
        .find(|entry| entry.name == name)
        .unwrap_or_else(|| panic!("{role} has no entry named {name}"))
}

// --- Tree Shape ---

#[test]
fn test_every_role_has_a_menu_starting_with_its_dashboard() {
    for role in Role::ALL {
        let tree = tree_for(role);
        assert!(!tree.is_empty(), "{role} has an empty menu");

        let first = &tree[0].items[0];
        assert_eq!(first.name, "Dashboard");
        assert_eq!(first.target_path.as_deref(), Some(default_path_for(role)));
    }
}

#[test]
fn test_every_target_is_reachable_by_its_role() {
    let registry = RouteRegistry::standard();

    for role in Role::ALL {
        for entry in entries(role) {
            if let Some(target) = &entry.target_path {
                assert!(
                    registry.is_allowed(role, target),
                    "{role} menu links to forbidden {target}"
                );
            }
        }
    }
}

#[test]
fn test_ids_are_unique_within_each_role_tree() {
    for role in Role::ALL {
        let mut seen = HashSet::new();
        for entry in entries(role) {
            assert!(seen.insert(entry.id.clone()), "duplicate id {}", entry.id);
        }
    }
}

#[test]
fn test_sibling_names_are_unique() {
    fn check(siblings: &[NavEntry]) {
        let mut names = HashSet::new();
        for entry in siblings {
            assert!(names.insert(&entry.name), "duplicate sibling {}", entry.name);
            check(&entry.children);
        }
    }

    for role in Role::ALL {
        for group in tree_for(role) {
            check(&group.items);
        }
    }
}

#[test]
fn test_grouping_nodes_have_children_and_no_target() {
    for role in Role::ALL {
        for entry in entries(role) {
            if entry.is_group() {
                assert!(!entry.children.is_empty(), "{} is an empty group", entry.id);
            }
        }
    }
}

#[test]
fn test_ids_are_scoped_by_role_group_and_parent() {
    let cbt = entry_named(Role::Teacher, "CBT/Ujian");
    assert_eq!(cbt.id, "teacher/pembelajaran/cbt-ujian");
    assert!(cbt.is_group());

    let bank = entry_named(Role::Teacher, "Bank Soal");
    assert_eq!(bank.id, "teacher/pembelajaran/cbt-ujian/bank-soal");

    // "Absensi" appears in several role trees; ids keep them apart.
    let teacher = entry_named(Role::Teacher, "Absensi");
    let student = entry_named(Role::Student, "Absensi");
    assert_ne!(teacher.id, student.id);
}

#[test]
fn test_slugify() {
    assert_eq!(slugify("CBT/Ujian"), "cbt-ujian");
    assert_eq!(slugify("Kelas Saya"), "kelas-saya");
    assert_eq!(slugify("  Orang  Tua! "), "orang-tua");
    assert_eq!(slugify("---"), "");
}

// --- Active State ---

#[test]
fn test_active_on_exact_and_descendant_paths() {
    let gradebook = entry_named(Role::Teacher, "Buku Nilai");

    assert!(gradebook.is_active("/teacher/gradebook"));
    assert!(gradebook.is_active("/teacher/gradebook/"));
    assert!(gradebook.is_active("/teacher/gradebook/7A"));
    assert!(gradebook.is_active("/teacher/gradebook?term=2"));
    assert!(!gradebook.is_active("/teacher/gradebooks"));
    assert!(!gradebook.is_active("/teacher"));
}

#[test]
fn test_collapsed_group_reports_active_child() {
    let expansion = ExpansionState::new();
    let tree = render(Role::Teacher, "/teacher/manage-questions", &expansion);

    let items: Vec<NavEntryView> = tree.into_iter().flat_map(|group| group.items).collect();
    let cbt = find_view(&items, "CBT/Ujian").unwrap();

    assert!(!cbt.open);
    assert!(!cbt.active);
    assert!(cbt.has_active_child);

    let bank = find_view(&cbt.children, "Bank Soal").unwrap();
    assert!(bank.active);
    assert!(!bank.has_active_child);

    let results = find_view(&cbt.children, "Hasil Ujian").unwrap();
    assert!(!results.active);
}

#[test]
fn test_has_active_child_is_false_elsewhere() {
    let cbt = entry_named(Role::Teacher, "CBT/Ujian");

    assert!(!cbt.has_active_child("/teacher/gradebook"));
    assert!(!cbt.is_active("/teacher/manage-questions"));
    assert!(cbt.has_active_child("/teacher/exams/12"));
}

#[test]
fn test_render_reflects_expansion_state() {
    let mut expansion = ExpansionState::new();
    expansion.toggle("teacher/pembelajaran/cbt-ujian");

    let tree = render(Role::Teacher, "/teacher/dashboard", &expansion);
    let items: Vec<NavEntryView> = tree.into_iter().flat_map(|group| group.items).collect();

    let cbt = find_view(&items, "CBT/Ujian").unwrap();
    assert!(cbt.open);
    assert!(!cbt.has_active_child);

    let dashboard = find_view(&items, "Dashboard").unwrap();
    assert!(dashboard.active);
    assert!(!dashboard.open);
}

#[test]
fn test_find_entry_by_exact_target() {
    assert_eq!(
        find_entry(Role::Parent, "/parent/children").map(|e| e.name.as_str()),
        Some("Data Anak")
    );
    assert_eq!(
        find_entry(Role::Teacher, "/teacher/manage-questions/").map(|e| e.name.as_str()),
        Some("Bank Soal")
    );
    assert!(find_entry(Role::Teacher, "/teacher/gradebook/7A").is_none());
    assert!(find_entry(Role::Student, "/teacher/gradebook").is_none());
}

#[test]
fn test_tree_for_returns_the_same_static_tree() {
    let a = navigation::tree_for(Role::Student);
    let b = navigation::tree_for(Role::Student);
    assert!(std::ptr::eq(a, b));
}

// --- Expansion State ---

#[test]
fn test_toggle_twice_restores_previous_value() {
    let mut expansion = ExpansionState::new();

    for id in ["teacher/pembelajaran/cbt-ujian", "no/such/entry", ""] {
        let before = expansion.is_open(id);
        expansion.toggle(id);
        assert_ne!(expansion.is_open(id), before);
        expansion.toggle(id);
        assert_eq!(expansion.is_open(id), before);
    }
}

#[test]
fn test_toggle_returns_new_state_and_keeps_ids_independent() {
    let mut expansion = ExpansionState::new();

    assert!(expansion.toggle("school/pengguna/manajemen-pengguna"));
    assert!(expansion.toggle("student/belajar/ujian"));
    assert!(!expansion.toggle("school/pengguna/manajemen-pengguna"));

    assert!(!expansion.is_open("school/pengguna/manajemen-pengguna"));
    assert!(expansion.is_open("student/belajar/ujian"));
    assert_eq!(expansion.open_ids(), vec!["student/belajar/ujian".to_string()]);
}

#[test]
fn test_expansion_starts_empty_and_clears() {
    let mut expansion = ExpansionState::new();
    assert!(expansion.open_ids().is_empty());

    expansion.toggle("a");
    expansion.toggle("b");
    assert_eq!(expansion.open_ids(), vec!["a".to_string(), "b".to_string()]);

    expansion.clear();
    assert_eq!(expansion, ExpansionState::new());
}
