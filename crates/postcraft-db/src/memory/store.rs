//! Generic versioned row store

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::fmt;

use postcraft_core::traits::RepoResult;
use postcraft_core::value_objects::UserId;
use postcraft_core::DomainError;

/// Row of a versioned configuration chain
pub(crate) trait Versioned: Clone + Send + Sync {
    type Id: Copy + Eq + fmt::Display + Send + Sync;
    /// Rows sharing a scope compete for the single default slot
    type Scope: Copy + Eq;

    const ENTITY: &'static str;

    fn id(&self) -> Self::Id;
    fn lineage_id(&self) -> Self::Id;
    fn owner(&self) -> Option<UserId>;
    fn version(&self) -> i32;
    fn is_active(&self) -> bool;
    fn set_inactive(&mut self);
    fn created_at(&self) -> DateTime<Utc>;
    fn scope(&self) -> Self::Scope;
    fn is_default(&self) -> bool;
    fn clear_default(&mut self);
    fn not_found(id: Self::Id) -> DomainError;
}

pub(crate) struct VersionStore<T> {
    rows: RwLock<Vec<T>>,
}

impl<T> Default for VersionStore<T> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }
}

fn visible_to<T: Versioned>(row: &T, owner: UserId) -> bool {
    row.owner().is_none_or(|o| o == owner)
}

fn clear_scope_defaults<T: Versioned>(rows: &mut [T], owner: Option<UserId>, scope: T::Scope) {
    for row in rows
        .iter_mut()
        .filter(|r| r.owner() == owner && r.scope() == scope && r.is_default())
    {
        row.clear_default();
    }
}

impl<T: Versioned> VersionStore<T> {
    pub fn find(&self, id: T::Id) -> Option<T> {
        self.rows.read().iter().find(|r| r.id() == id).cloned()
    }

    pub fn find_active(&self, owner: UserId, id: T::Id) -> Option<T> {
        self.rows
            .read()
            .iter()
            .find(|r| r.id() == id && r.is_active() && visible_to(*r, owner))
            .cloned()
    }

    /// Owner rows win over system rows, then the highest version
    pub fn resolve(&self, owner: UserId, filter: impl Fn(&T) -> bool) -> Option<T> {
        self.rows
            .read()
            .iter()
            .filter(|r| r.is_active() && visible_to(*r, owner) && filter(*r))
            .max_by_key(|r| (r.owner().is_some(), r.version()))
            .cloned()
    }

    /// Visible active rows, defaults first, newest first
    pub fn list(&self, owner: UserId, filter: impl Fn(&T) -> bool) -> Vec<T> {
        let mut rows: Vec<T> = self
            .rows
            .read()
            .iter()
            .filter(|r| r.is_active() && visible_to(*r, owner) && filter(*r))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.is_default()
                .cmp(&a.is_default())
                .then_with(|| b.created_at().cmp(&a.created_at()))
        });
        rows
    }

    pub fn history(&self, id: T::Id) -> Vec<T> {
        let rows = self.rows.read();
        let Some(lineage) = rows.iter().find(|r| r.id() == id).map(Versioned::lineage_id) else {
            return Vec::new();
        };
        let mut chain: Vec<T> = rows
            .iter()
            .filter(|r| r.lineage_id() == lineage)
            .cloned()
            .collect();
        chain.sort_by_key(Versioned::version);
        chain
    }

    pub fn insert(&self, row: T) -> T {
        let mut rows = self.rows.write();
        if row.is_default() {
            clear_scope_defaults(&mut rows, row.owner(), row.scope());
        }
        rows.push(row.clone());
        row
    }

    /// Supersede the owner's active row `id` with `next(current)`
    pub fn update(&self, id: T::Id, owner: UserId, next: impl FnOnce(&T) -> T) -> RepoResult<T> {
        let mut rows = self.rows.write();
        let pos = rows
            .iter()
            .position(|r| r.id() == id && r.owner() == Some(owner))
            .ok_or_else(|| T::not_found(id))?;

        if !rows[pos].is_active() {
            return Err(DomainError::StaleVersion {
                entity: T::ENTITY,
                id: id.to_string(),
            });
        }

        let row = next(&rows[pos]);
        rows[pos].set_inactive();
        if row.is_default() {
            clear_scope_defaults(&mut rows, row.owner(), row.scope());
        }
        rows.push(row.clone());
        Ok(row)
    }

    pub fn deactivate(&self, id: T::Id, owner: UserId) -> RepoResult<()> {
        let mut rows = self.rows.write();
        let row = rows
            .iter_mut()
            .find(|r| r.id() == id && r.owner() == Some(owner))
            .ok_or_else(|| T::not_found(id))?;
        row.set_inactive();
        Ok(())
    }
}
