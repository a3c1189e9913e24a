use crate::form::WorkOrderForm;
use crate::rechange::RechangeList;
use crate::reference::ReferenceLists;
use crate::work::{MechanicRechange, MechanicWork};

/// Turn a fetched record into display values in one step.
///
/// Runs once every reference list is available. Client and machine ids
/// become display names; ids missing from the lists are left as-is and
/// will fail resolution on submit.
pub fn hydrate(
    record: &MechanicWork,
    rechanges: &[MechanicRechange],
    refs: &ReferenceLists,
) -> (WorkOrderForm, RechangeList) {
    let mut form = WorkOrderForm::from_record(record);
    if let Some(name) = refs.client_name(&form.client) {
        form.client = name.to_string();
    }
    if let Some(name) = refs.machine_name(&form.machine) {
        form.machine = name.to_string();
    }
    let rows = RechangeList::from_records(rechanges, &refs.parts);
    (form, rows)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::reference::{Client, Machine, Part};

    fn refs() -> ReferenceLists {
        ReferenceLists::new(
            vec![Client {
                client_id: "5".into(),
                client_name: "Acme".into(),
            }],
            vec![Machine {
                machine_id: "7".into(),
                machine_name: "Excavator".into(),
            }],
            vec![Part {
                id: "10".into(),
                title: "Oil filter".into(),
            }],
        )
    }

    fn record(client: &str) -> MechanicWork {
        MechanicWork {
            mechanic_work_id: "1".into(),
            mechanic_work_client_id: client.into(),
            mechanic_work_machine_id: "7".into(),
            mechanic_work_date: Some("2023-01-01".into()),
            mechanic_work_hours: "3".into(),
            mechanic_work_works: "Oil change".into(),
            mechanic_work_finished: false,
        }
    }

    #[test]
    fn ids_become_names() {
        let rows = vec![MechanicRechange {
            mechanic_rechange_id: Some("100".into()),
            mechanic_rechange_number: "2".into(),
            mechanic_rechange_work_id: Some("1".into()),
            rechange_id: "10".into(),
        }];
        let (form, list) = hydrate(&record("5"), &rows, &refs());
        assert_eq!(form.client, "Acme");
        assert_eq!(form.machine, "Excavator");
        assert_eq!(form.date, NaiveDate::from_ymd_opt(2023, 1, 1));
        assert_eq!(list.rows()[0].title, "Oil filter");
    }

    #[test]
    fn unknown_ids_stay_and_fail_resolution() {
        let (form, _) = hydrate(&record("404"), &[], &refs());
        assert_eq!(form.client, "404");
        let state = crate::form::FormState::with_values(form);
        let errors = state.check(&refs()).unwrap_err();
        assert!(errors.client);
        assert!(!errors.machine);
    }

    #[test]
    fn same_result_regardless_of_list_order() {
        let mut reversed = refs();
        reversed.clients.insert(
            0,
            Client {
                client_id: "6".into(),
                client_name: "Globex".into(),
            },
        );
        let (a, _) = hydrate(&record("5"), &[], &refs());
        let (b, _) = hydrate(&record("5"), &[], &reversed);
        assert_eq!(a, b);
    }
}
