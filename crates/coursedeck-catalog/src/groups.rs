//! Collapsible course groups

use crate::error::CatalogError;
use crate::markup::{ElementId, PageMarkup};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub el: ElementId,
    pub toggle: Option<ElementId>,
    pub collapsed: bool,
}

impl Group {
    /// Value mirrored into the toggle's `aria-expanded`
    pub fn aria_expanded(&self) -> &'static str {
        if self.collapsed {
            "false"
        } else {
            "true"
        }
    }
}

/// Render instruction produced by a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupToggle {
    pub group: usize,
    pub container: ElementId,
    pub toggle: Option<ElementId>,
    pub collapsed: bool,
}

impl GroupToggle {
    pub fn aria_expanded(&self) -> &'static str {
        if self.collapsed {
            "false"
        } else {
            "true"
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GroupSet {
    groups: Vec<Group>,
}

impl GroupSet {
    pub fn from_markup(markup: &PageMarkup) -> Self {
        let groups = markup
            .groups
            .iter()
            .map(|g| Group {
                el: g.el,
                toggle: g.toggle,
                collapsed: g.collapsed,
            })
            .collect();
        Self { groups }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Group> {
        self.groups
            .get(index)
            .ok_or(CatalogError::GroupNotFound(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }

    /// Initial state of every group, for the startup render
    pub fn snapshot(&self) -> Vec<GroupToggle> {
        self.groups
            .iter()
            .enumerate()
            .map(|(group, g)| GroupToggle {
                group,
                container: g.el,
                toggle: g.toggle,
                collapsed: g.collapsed,
            })
            .collect()
    }

    /// Invert the collapsed flag of a group
    pub fn toggle(&mut self, index: usize) -> Result<GroupToggle> {
        let group = self
            .groups
            .get_mut(index)
            .ok_or(CatalogError::GroupNotFound(index))?;

        group.collapsed = !group.collapsed;

        tracing::debug!(group = index, collapsed = group.collapsed, "Toggled course group");

        Ok(GroupToggle {
            group: index,
            container: group.el,
            toggle: group.toggle,
            collapsed: group.collapsed,
        })
    }
}
