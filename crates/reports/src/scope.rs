//! Report scopes: which branch, which staff, which period.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_core::{BranchName, StaffId};

/// Staff member assigned to a branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: Option<StaffId>,
    pub name: String,
}

impl StaffMember {
    pub fn new(id: StaffId, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

/// Half-open time window `[from, to)`; an open end is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl Period {
    pub fn between(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from.is_none_or(|f| at >= f) && self.to.is_none_or(|t| at < t)
    }
}

/// Who and when a report covers.
///
/// A record belongs to the scope when its branch equals the scope's branch,
/// or when the staff member it is attributed to (by id or by name) is in the
/// scope's staff set. A scope with neither a branch nor staff covers
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportScope {
    pub branch_name: Option<BranchName>,
    pub staff: Vec<StaffMember>,
    pub period: Period,
}

impl ReportScope {
    pub fn company_wide() -> Self {
        Self::default()
    }

    pub fn branch(name: impl Into<BranchName>) -> Self {
        Self {
            branch_name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_staff(mut self, staff: impl IntoIterator<Item = StaffMember>) -> Self {
        self.staff.extend(staff);
        self
    }

    pub fn within(mut self, period: Period) -> Self {
        self.period = period;
        self
    }

    pub fn is_company_wide(&self) -> bool {
        self.branch_name.is_none() && self.staff.is_empty()
    }

    /// Membership test for a record attributed to `branch` and a staff member.
    pub fn covers(&self, branch: Option<&BranchName>, staff_id: Option<StaffId>, staff_name: Option<&str>) -> bool {
        if self.is_company_wide() {
            return true;
        }
        let branch_hit = match (&self.branch_name, branch) {
            (Some(scope), Some(record)) => scope == record,
            _ => false,
        };
        branch_hit || self.has_staff(staff_id, staff_name)
    }

    /// Stock belongs to a place, not a person: only the branch counts.
    pub fn covers_branch(&self, branch: Option<&BranchName>) -> bool {
        match &self.branch_name {
            None => true,
            Some(scope) => branch == Some(scope),
        }
    }

    fn has_staff(&self, staff_id: Option<StaffId>, staff_name: Option<&str>) -> bool {
        let name = staff_name.map(str::trim).filter(|n| !n.is_empty());
        self.staff.iter().any(|member| {
            let id_hit = matches!((member.id, staff_id), (Some(a), Some(b)) if a == b);
            let name_hit = name.is_some_and(|n| member.name.trim() == n);
            id_hit || name_hit
        })
    }
}
