// SPDX-License-Identifier: CEPL-1.0
use std::fmt;

use ash::vk;

use crate::runtime::Runtime;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QueueRole {
    Graphics,
    Compute,
    Transfer,
    SparseBinding,
    Present,
}

impl QueueRole {
    pub const ALL: [QueueRole; 5] = [
        QueueRole::Graphics,
        QueueRole::Compute,
        QueueRole::Transfer,
        QueueRole::SparseBinding,
        QueueRole::Present,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for QueueRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QueueRole::Graphics => "graphics",
            QueueRole::Compute => "compute",
            QueueRole::Transfer => "transfer",
            QueueRole::SparseBinding => "sparse-binding",
            QueueRole::Present => "present",
        })
    }
}

/// Capability bits that map directly to a role. Present is tested separately
/// against the surface.
const CAPABILITY_ROLES: [(vk::QueueFlags, QueueRole); 4] = [
    (vk::QueueFlags::GRAPHICS, QueueRole::Graphics),
    (vk::QueueFlags::COMPUTE, QueueRole::Compute),
    (vk::QueueFlags::TRANSFER, QueueRole::Transfer),
    (vk::QueueFlags::SPARSE_BINDING, QueueRole::SparseBinding),
];

/// Role -> queue family index. Several roles may share one index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueueRoleAssignment {
    slots: [Option<u32>; 5],
}

impl QueueRoleAssignment {
    pub fn get(&self, role: QueueRole) -> Option<u32> {
        self.slots[role.slot()]
    }

    /// Records `index` for `role` unless the role already has one.
    pub fn assign(&mut self, role: QueueRole, index: u32) {
        self.slots[role.slot()].get_or_insert(index);
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn graphics(&self) -> Option<u32> {
        self.get(QueueRole::Graphics)
    }

    pub fn present(&self) -> Option<u32> {
        self.get(QueueRole::Present)
    }

    /// `(graphics, present)` once both are assigned.
    pub fn presentation_pair(&self) -> Option<(u32, u32)> {
        Some((self.graphics()?, self.present()?))
    }

    /// Distinct families backing graphics and present, ascending.
    pub fn unique_presentation_families(&self) -> Vec<u32> {
        let mut families: Vec<u32> = [self.graphics(), self.present()]
            .into_iter()
            .flatten()
            .collect();
        families.sort_unstable();
        families.dedup();
        families
    }
}

/// First-fit role assignment over `families` in index order.
/// `supports_present` is consulted only while present is still unassigned.
pub fn assign_queue_roles(
    families: &[vk::QueueFamilyProperties],
    mut supports_present: impl FnMut(u32) -> bool,
) -> QueueRoleAssignment {
    let mut roles = QueueRoleAssignment::default();

    for (index, family) in families.iter().enumerate() {
        let index = index as u32;
        if family.queue_count == 0 {
            continue;
        }

        for (flag, role) in CAPABILITY_ROLES {
            if family.queue_flags.contains(flag) {
                roles.assign(role, index);
            }
        }

        if roles.present().is_none() && supports_present(index) {
            roles.assign(QueueRole::Present, index);
        }

        if roles.is_complete() {
            break;
        }
    }

    roles
}

pub fn find_queue_roles<R: Runtime + ?Sized>(
    runtime: &R,
    phys: vk::PhysicalDevice,
    surface: vk::SurfaceKHR,
) -> QueueRoleAssignment {
    let families = runtime.queue_families(phys);
    assign_queue_roles(&families, |index| {
        runtime
            .supports_present(phys, index, surface)
            .unwrap_or(false)
    })
}
