//! Initial data for the server: login accounts plus the work order dataset.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use workorder_core::reference::{Client, Machine, Part};
use workorder_core::work::{MechanicRechange, MechanicWork};
use workorder_service::Dataset;

use crate::auth::AuthConfig;

pub const DEMO_EMAIL: &str = "mechanic@example.com";
pub const DEMO_PASSWORD: &str = "mechanic";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedAccount {
    pub email: String,
    pub password: String,
}

/// Seed file layout: `accounts` next to the dataset keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub accounts: Vec<SeedAccount>,
    #[serde(flatten)]
    pub dataset: Dataset,
}

impl Seed {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading seed file {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing seed file {}", path.display()))
    }

    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig::new(
            self.accounts
                .iter()
                .map(|a| (a.email.clone(), a.password.clone())),
        )
    }

    /// One account, a few clients, machines and parts, and two work orders
    /// (one still open, one closed).
    pub fn demo() -> Self {
        let client = |id: &str, name: &str| Client {
            client_id: id.into(),
            client_name: name.into(),
        };
        let machine = |id: &str, name: &str| Machine {
            machine_id: id.into(),
            machine_name: name.into(),
        };
        let part = |id: &str, title: &str| Part {
            id: id.into(),
            title: title.into(),
        };
        let rechange = |id: &str, work: &str, part: &str, number: &str| MechanicRechange {
            mechanic_rechange_id: Some(id.into()),
            mechanic_rechange_number: number.into(),
            mechanic_rechange_work_id: Some(work.into()),
            rechange_id: part.into(),
        };

        Self {
            accounts: vec![SeedAccount {
                email: DEMO_EMAIL.into(),
                password: DEMO_PASSWORD.into(),
            }],
            dataset: Dataset {
                clients: vec![
                    client("1", "Acme Farms"),
                    client("2", "Northside Quarry"),
                    client("3", "Riverbank Logistics"),
                ],
                machines: vec![
                    machine("1", "Excavator CAT 320"),
                    machine("2", "Wheel Loader 950"),
                    machine("3", "Tractor JD 6120"),
                ],
                parts: vec![
                    part("1", "Oil filter"),
                    part("2", "Air filter"),
                    part("3", "Hydraulic hose"),
                    part("4", "Brake pads"),
                ],
                works: vec![
                    MechanicWork {
                        mechanic_work_id: "1".into(),
                        mechanic_work_client_id: "1".into(),
                        mechanic_work_machine_id: "3".into(),
                        mechanic_work_date: Some("2024-03-04".into()),
                        mechanic_work_hours: "2.5".into(),
                        mechanic_work_works: "Oil and filter change".into(),
                        mechanic_work_finished: false,
                    },
                    MechanicWork {
                        mechanic_work_id: "2".into(),
                        mechanic_work_client_id: "2".into(),
                        mechanic_work_machine_id: "1".into(),
                        mechanic_work_date: Some("2024-02-19".into()),
                        mechanic_work_hours: "6".into(),
                        mechanic_work_works: "Replaced burst boom hose".into(),
                        mechanic_work_finished: true,
                    },
                ],
                rechanges: vec![
                    rechange("3", "1", "1", "1"),
                    rechange("4", "1", "2", "1"),
                    rechange("5", "2", "3", "2"),
                ],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_file_reads_accounts_and_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(
            &path,
            r#"{
                "accounts": [{"email": "a@b.c", "password": "pw"}],
                "clients": [{"client_id": "9", "client_name": "Solo"}]
            }"#,
        )
        .unwrap();
        let seed = Seed::load(&path).unwrap();
        assert_eq!(seed.accounts.len(), 1);
        assert_eq!(seed.dataset.clients[0].client_name, "Solo");
        assert!(seed.dataset.works.is_empty());
    }

    #[test]
    fn missing_seed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Seed::load(&dir.path().join("nope.json")).is_err());
    }

    #[test]
    fn demo_rows_point_at_known_parts() {
        let seed = Seed::demo();
        let data = &seed.dataset;
        for row in &data.rechanges {
            assert!(data.parts.iter().any(|p| p.id == row.rechange_id));
        }
    }

    #[tokio::test]
    async fn demo_account_can_log_in() {
        let auth = Seed::demo().auth_config();
        let creds = workorder_core::session::Credentials {
            email: DEMO_EMAIL.into(),
            password: DEMO_PASSWORD.into(),
        };
        assert!(auth.login(&creds).await.is_some());
    }
}
