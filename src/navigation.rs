use std::sync::LazyLock;

use crate::{
    expansion::ExpansionState,
    models::{NavEntryView, NavGroupView, Role},
    registry::{area_root, is_same_or_descendant, normalize_path},
};

/// NavEntry
///
/// One node of a role's menu. An entry without `target_path` is a grouping node:
/// it only opens and closes, it cannot be navigated to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    /// Unique across the whole role tree, e.g. `teacher/pembelajaran/cbt-ujian`.
    pub id: String,
    pub name: String,
    pub target_path: Option<String>,
    pub children: Vec<NavEntry>,
}

/// NavGroup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavGroup {
    pub title: String,
    pub items: Vec<NavEntry>,
}

impl NavEntry {
    pub fn is_group(&self) -> bool {
        self.target_path.is_none()
    }

    /// is_active
    ///
    /// The current path equals the target, or sits below it on a `/` boundary.
    /// Grouping nodes are never active themselves.
    pub fn is_active(&self, current_path: &str) -> bool {
        let Some(current_path) = normalize_path(current_path) else {
            return false;
        };
        self.target_path
            .as_deref()
            .is_some_and(|target| is_same_or_descendant(current_path, target))
    }

    /// has_active_child
    ///
    /// True if any transitive child is active, at any depth.
    pub fn has_active_child(&self, current_path: &str) -> bool {
        self.children
            .iter()
            .any(|child| child.is_active(current_path) || child.has_active_child(current_path))
    }

    /// Depth-first iterator over this entry and all of its descendants.
    pub fn walk(&self) -> Box<dyn Iterator<Item = &NavEntry> + '_> {
        Box::new(std::iter::once(self).chain(self.children.iter().flat_map(NavEntry::walk)))
    }

    fn view(&self, current_path: &str, expansion: &ExpansionState) -> NavEntryView {
        NavEntryView {
            id: self.id.clone(),
            name: self.name.clone(),
            target_path: self.target_path.clone(),
            active: self.is_active(current_path),
            has_active_child: self.has_active_child(current_path),
            open: expansion.is_open(&self.id),
            children: self
                .children
                .iter()
                .map(|child| child.view(current_path, expansion))
                .collect(),
        }
    }
}

/// tree_for
///
/// The menu of a role. Built once from the static template on first use and shared
/// read-only afterwards.
pub fn tree_for(role: Role) -> &'static [NavGroup] {
    match role {
        Role::SuperAdmin => SUPER_ADMIN_TREE.as_slice(),
        Role::SchoolAdmin => SCHOOL_ADMIN_TREE.as_slice(),
        Role::Teacher => TEACHER_TREE.as_slice(),
        Role::Student => STUDENT_TREE.as_slice(),
        Role::Parent => PARENT_TREE.as_slice(),
    }
}

/// render
///
/// Projects a role's tree for the renderer, attaching the active flags for
/// `current_path` and the open flags from `expansion`.
pub fn render(role: Role, current_path: &str, expansion: &ExpansionState) -> Vec<NavGroupView> {
    tree_for(role)
        .iter()
        .map(|group| NavGroupView {
            title: group.title.clone(),
            items: group
                .items
                .iter()
                .map(|entry| entry.view(current_path, expansion))
                .collect(),
        })
        .collect()
}

/// find_entry
///
/// The entry whose target is exactly `path`, searching the whole tree.
pub fn find_entry(role: Role, path: &str) -> Option<&'static NavEntry> {
    let path = normalize_path(path)?;
    entries(role).find(|entry| entry.target_path.as_deref() == Some(path))
}

/// Every entry of a role's tree, depth-first.
pub fn entries(role: Role) -> impl Iterator<Item = &'static NavEntry> {
    tree_for(role)
        .iter()
        .flat_map(|group| group.items.iter())
        .flat_map(NavEntry::walk)
}

// --- Static Templates ---

struct Item {
    name: &'static str,
    target: Option<&'static str>,
    children: &'static [Item],
}

const fn link(name: &'static str, target: &'static str) -> Item {
    Item { name, target: Some(target), children: &[] }
}

const fn folder(name: &'static str, children: &'static [Item]) -> Item {
    Item { name, target: None, children }
}

type Template = &'static [(&'static str, &'static [Item])];

const SUPER_ADMIN: Template = &[
    ("Utama", &[link("Dashboard", "/super-admin/dashboard")]),
    (
        "Manajemen",
        &[
            link("Sekolah", "/super-admin/schools"),
            folder(
                "Pengguna",
                &[
                    link("Admin Sekolah", "/super-admin/school-admins"),
                    link("Semua Pengguna", "/super-admin/users"),
                ],
            ),
            link("Paket Langganan", "/super-admin/subscriptions"),
        ],
    ),
    (
        "Sistem",
        &[
            link("Laporan", "/super-admin/reports"),
            link("Pengaturan", "/super-admin/settings"),
        ],
    ),
];

const SCHOOL_ADMIN: Template = &[
    ("Utama", &[link("Dashboard", "/school/dashboard")]),
    (
        "Akademik",
        &[
            link("Kelas", "/school/classes"),
            link("Mata Pelajaran", "/school/subjects"),
            link("Jadwal", "/school/schedules"),
            link("Tahun Ajaran", "/school/academic-years"),
        ],
    ),
    (
        "Pengguna",
        &[folder(
            "Manajemen Pengguna",
            &[
                link("Semua Pengguna", "/school/users"),
                link("Guru", "/school/teachers"),
                link("Siswa", "/school/students"),
                link("Orang Tua", "/school/parents"),
            ],
        )],
    ),
    (
        "Laporan",
        &[
            link("Laporan Akademik", "/school/reports"),
            link("Pengumuman", "/school/announcements"),
        ],
    ),
];

const TEACHER: Template = &[
    ("Utama", &[link("Dashboard", "/teacher/dashboard")]),
    (
        "Pembelajaran",
        &[
            link("Kelas Saya", "/teacher/classes"),
            link("Materi", "/teacher/materials"),
            link("Tugas", "/teacher/assignments"),
            folder(
                "CBT/Ujian",
                &[
                    link("Bank Soal", "/teacher/manage-questions"),
                    link("Jadwal Ujian", "/teacher/exams"),
                    link("Hasil Ujian", "/teacher/exam-results"),
                ],
            ),
        ],
    ),
    (
        "Penilaian",
        &[
            link("Buku Nilai", "/teacher/gradebook"),
            link("Absensi", "/teacher/attendance"),
        ],
    ),
];

const STUDENT: Template = &[
    ("Utama", &[link("Dashboard", "/student/dashboard")]),
    (
        "Belajar",
        &[
            link("Mata Pelajaran", "/student/courses"),
            link("Tugas", "/student/assignments"),
            folder(
                "Ujian",
                &[
                    link("Ujian Aktif", "/student/exams"),
                    link("Riwayat Ujian", "/student/exam-history"),
                ],
            ),
            link("Jadwal", "/student/schedule"),
        ],
    ),
    (
        "Hasil",
        &[
            link("Nilai", "/student/grades"),
            link("Absensi", "/student/attendance"),
        ],
    ),
];

const PARENT: Template = &[
    ("Utama", &[link("Dashboard", "/parent/dashboard")]),
    (
        "Anak",
        &[
            link("Data Anak", "/parent/children"),
            link("Nilai Anak", "/parent/grades"),
            link("Absensi", "/parent/attendance"),
        ],
    ),
    (
        "Komunikasi",
        &[
            link("Pengumuman", "/parent/announcements"),
            link("Pesan", "/parent/messages"),
        ],
    ),
];

static SUPER_ADMIN_TREE: LazyLock<Vec<NavGroup>> =
    LazyLock::new(|| build(Role::SuperAdmin, SUPER_ADMIN));
static SCHOOL_ADMIN_TREE: LazyLock<Vec<NavGroup>> =
    LazyLock::new(|| build(Role::SchoolAdmin, SCHOOL_ADMIN));
static TEACHER_TREE: LazyLock<Vec<NavGroup>> = LazyLock::new(|| build(Role::Teacher, TEACHER));
static STUDENT_TREE: LazyLock<Vec<NavGroup>> = LazyLock::new(|| build(Role::Student, STUDENT));
static PARENT_TREE: LazyLock<Vec<NavGroup>> = LazyLock::new(|| build(Role::Parent, PARENT));

fn build(role: Role, template: Template) -> Vec<NavGroup> {
    let root = area_root(role).trim_start_matches('/');
    template
        .iter()
        .map(|(title, items)| {
            let scope = format!("{}/{}", root, slugify(title));
            NavGroup {
                title: title.to_string(),
                items: items.iter().map(|item| build_entry(&scope, item)).collect(),
            }
        })
        .collect()
}

fn build_entry(scope: &str, item: &Item) -> NavEntry {
    let id = format!("{}/{}", scope, slugify(item.name));
    NavEntry {
        name: item.name.to_string(),
        target_path: item.target.map(str::to_string),
        children: item
            .children
            .iter()
            .map(|child| build_entry(&id, child))
            .collect(),
        id,
    }
}

/// slugify
///
/// Lowercase ASCII alphanumerics, with every other run of characters collapsed to `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
