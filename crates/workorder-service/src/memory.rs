use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use workorder_core::reference::{Client, Machine, Part};
use workorder_core::work::{
    parse_wire_date, CreatedWork, MechanicRechange, MechanicWork, WorkMessage, WorkPayload,
};

use crate::{ServiceError, WorkOrderService};

/// Everything the in-memory service holds. Also the shape of a seed file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub machines: Vec<Machine>,
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default)]
    pub works: Vec<MechanicWork>,
    #[serde(default)]
    pub rechanges: Vec<MechanicRechange>,
}

struct State {
    data: Dataset,
    next_id: u64,
}

impl State {
    fn allocate_id(&mut self) -> String {
        let id = self.next_id;
        self.next_id += 1;
        id.to_string()
    }

    fn work_mut(&mut self, id: &str) -> Result<&mut MechanicWork, ServiceError> {
        self.data
            .works
            .iter_mut()
            .find(|w| w.mechanic_work_id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("mechanic work {id}")))
    }

    fn check_payload(&self, payload: &WorkPayload) -> Result<(), ServiceError> {
        let work = &payload.work;
        if !self
            .data
            .clients
            .iter()
            .any(|c| c.client_id == work.mechanic_work_client_id)
        {
            return Err(ServiceError::InvalidInput(format!(
                "client {} does not exist",
                work.mechanic_work_client_id
            )));
        }
        if !self
            .data
            .machines
            .iter()
            .any(|m| m.machine_id == work.mechanic_work_machine_id)
        {
            return Err(ServiceError::InvalidInput(format!(
                "machine {} does not exist",
                work.mechanic_work_machine_id
            )));
        }
        if parse_wire_date(&work.mechanic_work_date).is_none() {
            return Err(ServiceError::InvalidInput(format!(
                "invalid date: {}",
                work.mechanic_work_date
            )));
        }
        if work.mechanic_work_hours.trim().is_empty() {
            return Err(ServiceError::InvalidInput("hours are required".into()));
        }
        for row in &payload.rechanges {
            if !self.data.parts.iter().any(|p| p.id == row.rechange_id) {
                return Err(ServiceError::InvalidInput(format!(
                    "rechange {} does not exist",
                    row.rechange_id
                )));
            }
            if row.mechanic_rechange_number.trim().is_empty() {
                return Err(ServiceError::InvalidInput(
                    "rechange quantity is required".into(),
                ));
            }
        }
        Ok(())
    }

    /// Replace the rows attached to `work_id` with the payload's rows.
    ///
    /// A payload id survives only if that row already belongs to `work_id`;
    /// anything else gets a fresh id.
    fn replace_rechanges(&mut self, work_id: &str, rows: &[MechanicRechange]) {
        let mut owned: HashSet<String> = self
            .data
            .rechanges
            .iter()
            .filter(|r| r.mechanic_rechange_work_id.as_deref() == Some(work_id))
            .filter_map(|r| r.mechanic_rechange_id.clone())
            .collect();
        self.data
            .rechanges
            .retain(|r| r.mechanic_rechange_work_id.as_deref() != Some(work_id));
        for row in rows {
            let id = match &row.mechanic_rechange_id {
                Some(id) if owned.remove(id) => id.clone(),
                _ => self.allocate_id(),
            };
            self.data.rechanges.push(MechanicRechange {
                mechanic_rechange_id: Some(id),
                mechanic_rechange_number: row.mechanic_rechange_number.trim().to_string(),
                mechanic_rechange_work_id: Some(work_id.to_string()),
                rechange_id: row.rechange_id.clone(),
            });
        }
    }
}

/// In-process implementation used by the server and by tests.
pub struct MemoryService {
    state: RwLock<State>,
}

impl MemoryService {
    pub fn new(data: Dataset) -> Self {
        let next_id = data
            .works
            .iter()
            .map(|w| w.mechanic_work_id.as_str())
            .chain(
                data.rechanges
                    .iter()
                    .filter_map(|r| r.mechanic_rechange_id.as_deref()),
            )
            .filter_map(|id| id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        Self {
            state: RwLock::new(State { data, next_id }),
        }
    }

    pub async fn snapshot(&self) -> Dataset {
        self.state.read().await.data.clone()
    }
}

impl Default for MemoryService {
    fn default() -> Self {
        Self::new(Dataset::default())
    }
}

#[async_trait]
impl WorkOrderService for MemoryService {
    async fn get_mechanic_work(&self, _token: &str, id: &str) -> Result<MechanicWork, ServiceError> {
        let state = self.state.read().await;
        state
            .data
            .works
            .iter()
            .find(|w| w.mechanic_work_id == id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("mechanic work {id}")))
    }

    async fn create_mechanic_work(
        &self,
        _token: &str,
        payload: &WorkPayload,
    ) -> Result<CreatedWork, ServiceError> {
        let mut state = self.state.write().await;
        state.check_payload(payload)?;
        let id = state.allocate_id();
        let work = MechanicWork {
            mechanic_work_id: id.clone(),
            mechanic_work_client_id: payload.work.mechanic_work_client_id.clone(),
            mechanic_work_machine_id: payload.work.mechanic_work_machine_id.clone(),
            mechanic_work_date: Some(payload.work.mechanic_work_date.clone()),
            mechanic_work_hours: payload.work.mechanic_work_hours.clone(),
            mechanic_work_works: payload.work.mechanic_work_works.clone(),
            mechanic_work_finished: false,
        };
        state.data.works.push(work.clone());
        state.replace_rechanges(&id, &payload.rechanges);
        Ok(CreatedWork {
            message: "Work order created".into(),
            work,
        })
    }

    async fn update_mechanic_work(
        &self,
        _token: &str,
        id: &str,
        payload: &WorkPayload,
    ) -> Result<WorkMessage, ServiceError> {
        let mut state = self.state.write().await;
        if state.work_mut(id)?.mechanic_work_finished {
            return Err(ServiceError::InvalidInput(format!(
                "mechanic work {id} is closed"
            )));
        }
        state.check_payload(payload)?;
        let work = state.work_mut(id)?;
        work.mechanic_work_client_id = payload.work.mechanic_work_client_id.clone();
        work.mechanic_work_machine_id = payload.work.mechanic_work_machine_id.clone();
        work.mechanic_work_date = Some(payload.work.mechanic_work_date.clone());
        work.mechanic_work_hours = payload.work.mechanic_work_hours.clone();
        work.mechanic_work_works = payload.work.mechanic_work_works.clone();
        state.replace_rechanges(id, &payload.rechanges);
        Ok(WorkMessage {
            message: "Work order updated".into(),
        })
    }

    async fn finish_mechanic_work(&self, _token: &str, id: &str) -> Result<WorkMessage, ServiceError> {
        let mut state = self.state.write().await;
        let work = state.work_mut(id)?;
        if work.mechanic_work_finished {
            return Err(ServiceError::InvalidInput(format!(
                "mechanic work {id} is already closed"
            )));
        }
        work.mechanic_work_finished = true;
        Ok(WorkMessage {
            message: "Work order closed".into(),
        })
    }

    async fn list_mechanic_rechanges(
        &self,
        _token: &str,
        work_id: &str,
    ) -> Result<Vec<MechanicRechange>, ServiceError> {
        let state = self.state.read().await;
        if !state.data.works.iter().any(|w| w.mechanic_work_id == work_id) {
            return Err(ServiceError::NotFound(format!("mechanic work {work_id}")));
        }
        Ok(state
            .data
            .rechanges
            .iter()
            .filter(|r| r.mechanic_rechange_work_id.as_deref() == Some(work_id))
            .cloned()
            .collect())
    }

    async fn list_clients(&self, _token: &str) -> Result<Vec<Client>, ServiceError> {
        Ok(self.state.read().await.data.clients.clone())
    }

    async fn list_machines(&self, _token: &str) -> Result<Vec<Machine>, ServiceError> {
        Ok(self.state.read().await.data.machines.clone())
    }

    async fn list_parts(&self, _token: &str) -> Result<Vec<Part>, ServiceError> {
        Ok(self.state.read().await.data.parts.clone())
    }
}

#[cfg(test)]
mod tests {
    use workorder_core::work::WorkInput;

    use super::*;

    fn dataset() -> Dataset {
        Dataset {
            clients: vec![Client {
                client_id: "5".into(),
                client_name: "Acme".into(),
            }],
            machines: vec![Machine {
                machine_id: "7".into(),
                machine_name: "Excavator".into(),
            }],
            parts: vec![Part {
                id: "10".into(),
                title: "Oil filter".into(),
            }],
            works: vec![MechanicWork {
                mechanic_work_id: "1".into(),
                mechanic_work_client_id: "5".into(),
                mechanic_work_machine_id: "7".into(),
                mechanic_work_date: Some("2023-01-01".into()),
                mechanic_work_hours: "3".into(),
                mechanic_work_works: "Oil change".into(),
                mechanic_work_finished: false,
            }],
            rechanges: vec![MechanicRechange {
                mechanic_rechange_id: Some("20".into()),
                mechanic_rechange_number: "1".into(),
                mechanic_rechange_work_id: Some("1".into()),
                rechange_id: "10".into(),
            }],
        }
    }

    fn payload(client: &str) -> WorkPayload {
        WorkPayload {
            work: WorkInput {
                mechanic_work_client_id: client.into(),
                mechanic_work_machine_id: "7".into(),
                mechanic_work_date: "2023-02-02".into(),
                mechanic_work_hours: "4".into(),
                mechanic_work_works: "Brakes".into(),
            },
            rechanges: vec![MechanicRechange {
                mechanic_rechange_id: None,
                mechanic_rechange_number: " 2 ".into(),
                mechanic_rechange_work_id: None,
                rechange_id: "10".into(),
            }],
        }
    }

    #[tokio::test]
    async fn update_replaces_fields_and_rows() {
        let svc = MemoryService::new(dataset());
        svc.update_mechanic_work("t", "1", &payload("5"))
            .await
            .unwrap();
        let work = svc.get_mechanic_work("t", "1").await.unwrap();
        assert_eq!(work.mechanic_work_works, "Brakes");
        assert_eq!(work.mechanic_work_date.as_deref(), Some("2023-02-02"));

        let rows = svc.list_mechanic_rechanges("t", "1").await.unwrap();
        assert_eq!(rows.len(), 1);
        // new ids continue after the highest seeded id
        assert_eq!(rows[0].mechanic_rechange_id.as_deref(), Some("21"));
        assert_eq!(rows[0].mechanic_rechange_number, "2");
        assert_eq!(rows[0].mechanic_rechange_work_id.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn update_keeps_own_row_ids_only() {
        let mut data = dataset();
        let second = MechanicWork {
            mechanic_work_id: "2".into(),
            ..data.works[0].clone()
        };
        data.works.push(second);
        data.rechanges.push(MechanicRechange {
            mechanic_rechange_id: Some("30".into()),
            mechanic_rechange_number: "1".into(),
            mechanic_rechange_work_id: Some("2".into()),
            rechange_id: "10".into(),
        });
        let svc = MemoryService::new(data);

        let row = |id: &str| MechanicRechange {
            mechanic_rechange_id: Some(id.into()),
            mechanic_rechange_number: "1".into(),
            mechanic_rechange_work_id: None,
            rechange_id: "10".into(),
        };
        let mut update = payload("5");
        // own row, another work's row, the own row again, an unknown id
        update.rechanges = vec![row("20"), row("30"), row("20"), row("99")];
        svc.update_mechanic_work("t", "1", &update).await.unwrap();

        let ids: Vec<String> = svc
            .list_mechanic_rechanges("t", "1")
            .await
            .unwrap()
            .into_iter()
            .filter_map(|r| r.mechanic_rechange_id)
            .collect();
        assert_eq!(ids, vec!["20", "31", "32", "33"]);

        let other = svc.list_mechanic_rechanges("t", "2").await.unwrap();
        assert_eq!(other.len(), 1);
        assert_eq!(other[0].mechanic_rechange_id.as_deref(), Some("30"));

        let all = svc.snapshot().await.rechanges;
        let unique: HashSet<_> = all.iter().map(|r| &r.mechanic_rechange_id).collect();
        assert_eq!(unique.len(), all.len());
    }

    #[tokio::test]
    async fn update_rejects_unknown_references() {
        let svc = MemoryService::new(dataset());
        let err = svc
            .update_mechanic_work("t", "1", &payload("99"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
        assert_eq!(err.message(), "client 99 does not exist");
    }

    #[tokio::test]
    async fn missing_work_is_not_found() {
        let svc = MemoryService::new(dataset());
        assert!(matches!(
            svc.get_mechanic_work("t", "404").await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            svc.list_mechanic_rechanges("t", "404").await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            svc.finish_mechanic_work("t", "404").await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn finish_closes_once() {
        let svc = MemoryService::new(dataset());
        svc.finish_mechanic_work("t", "1").await.unwrap();
        assert!(svc.get_mechanic_work("t", "1").await.unwrap().mechanic_work_finished);
        assert!(svc.finish_mechanic_work("t", "1").await.is_err());
        assert!(matches!(
            svc.update_mechanic_work("t", "1", &payload("5")).await,
            Err(ServiceError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn create_assigns_fresh_ids() {
        let svc = MemoryService::new(dataset());
        let created = svc.create_mechanic_work("t", &payload("5")).await.unwrap();
        assert_eq!(created.work.mechanic_work_id, "21");
        let rows = svc.list_mechanic_rechanges("t", "21").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].mechanic_rechange_id.as_deref(), Some("22"));
        assert_eq!(svc.snapshot().await.works.len(), 2);
    }
}
