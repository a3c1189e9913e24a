use serde::{Deserialize, Serialize};

use crate::error::ResolveError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub client_id: String,
    pub client_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    pub machine_id: String,
    pub machine_name: String,
}

/// Catalog entry for a part ("rechange").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub id: String,
    pub title: String,
}

/// Lookup tables that map stable ids to display names.
///
/// Replaced wholesale when refreshed; a form never sees a partially
/// updated set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceLists {
    pub clients: Vec<Client>,
    pub machines: Vec<Machine>,
    pub parts: Vec<Part>,
}

impl ReferenceLists {
    pub fn new(clients: Vec<Client>, machines: Vec<Machine>, parts: Vec<Part>) -> Self {
        Self {
            clients,
            machines,
            parts,
        }
    }

    pub fn client_name(&self, id: &str) -> Option<&str> {
        self.clients
            .iter()
            .find(|c| c.client_id == id)
            .map(|c| c.client_name.as_str())
    }

    pub fn machine_name(&self, id: &str) -> Option<&str> {
        self.machines
            .iter()
            .find(|m| m.machine_id == id)
            .map(|m| m.machine_name.as_str())
    }

    pub fn part_title(&self, id: &str) -> Option<&str> {
        self.parts
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.title.as_str())
    }

    /// Map a client display name back to its id.
    pub fn resolve_client(&self, name: &str) -> Result<&str, ResolveError> {
        self.clients
            .iter()
            .find(|c| c.client_name == name)
            .map(|c| c.client_id.as_str())
            .ok_or_else(|| ResolveError::UnknownClient(name.to_string()))
    }

    /// Map a machine display name back to its id.
    pub fn resolve_machine(&self, name: &str) -> Result<&str, ResolveError> {
        self.machines
            .iter()
            .find(|m| m.machine_name == name)
            .map(|m| m.machine_id.as_str())
            .ok_or_else(|| ResolveError::UnknownMachine(name.to_string()))
    }

    pub fn client_names(&self) -> Vec<String> {
        self.clients.iter().map(|c| c.client_name.clone()).collect()
    }

    pub fn machine_names(&self) -> Vec<String> {
        self.machines.iter().map(|m| m.machine_name.clone()).collect()
    }

    pub fn part_titles(&self) -> Vec<String> {
        self.parts.iter().map(|p| p.title.clone()).collect()
    }
}

/// First catalog entry whose title matches exactly.
pub fn resolve_part<'a>(parts: &'a [Part], title: &str) -> Result<&'a Part, ResolveError> {
    parts
        .iter()
        .find(|p| p.title == title)
        .ok_or_else(|| ResolveError::UnknownPart(title.to_string()))
}
