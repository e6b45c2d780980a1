use chrono::NaiveDateTime;
use serde::Serialize;

use crate::priority::Priority;
use crate::records::{Lead, LeadStatus, RecordId};

/// Number of leads shown in the dashboard's recent inquiries block.
pub const RECENT_INQUIRY_COUNT: usize = 3;

/// One row of the dashboard's recent inquiries block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentInquiry {
    pub customer: String,
    pub inquiry_id: RecordId,
    pub service: String,
    pub status: LeadStatus,
    pub date: Option<NaiveDateTime>,
    pub priority: Priority,
}

impl RecentInquiry {
    fn from_lead(lead: &Lead) -> Self {
        // Anything the backend stores other than "new" has been followed up.
        let status = if lead.status == LeadStatus::New.as_str() {
            LeadStatus::New
        } else {
            LeadStatus::Contacted
        };
        RecentInquiry {
            customer: lead.name.clone(),
            inquiry_id: lead.lead_id.clone(),
            service: lead.service.clone(),
            status,
            date: lead.date,
            priority: lead.priority.unwrap_or(Priority::Medium),
        }
    }
}

/// First leads in backend order. The list is not re-sorted.
pub fn recent_inquiries(leads: &[Lead]) -> Vec<RecentInquiry> {
    leads
        .iter()
        .take(RECENT_INQUIRY_COUNT)
        .map(RecentInquiry::from_lead)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead(id: i64, status: &str, priority: Option<Priority>) -> Lead {
        Lead {
            lead_id: RecordId::Number(id),
            name: format!("lead {}", id),
            service: "GST Registration".to_string(),
            status: status.to_string(),
            priority,
            ..Default::default()
        }
    }

    #[test]
    fn test_takes_first_three_in_backend_order() {
        let leads: Vec<_> = (1..=5).map(|i| lead(i, "new", None)).collect();
        let ids: Vec<_> = recent_inquiries(&leads)
            .into_iter()
            .map(|r| r.inquiry_id)
            .collect();
        assert_eq!(
            ids,
            vec![RecordId::Number(1), RecordId::Number(2), RecordId::Number(3)]
        );
    }

    #[test]
    fn test_status_collapses_to_new_or_contacted() {
        let leads = vec![
            lead(1, "new", None),
            lead(2, "converted", None),
            lead(3, "New", None),
        ];
        let statuses: Vec<_> = recent_inquiries(&leads).into_iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![LeadStatus::New, LeadStatus::Contacted, LeadStatus::Contacted]
        );
    }

    #[test]
    fn test_missing_priority_defaults_to_medium() {
        let leads = vec![lead(1, "new", None), lead(2, "new", Some(Priority::High))];
        let recent = recent_inquiries(&leads);
        assert_eq!(recent[0].priority, Priority::Medium);
        assert_eq!(recent[1].priority, Priority::High);
    }

    #[test]
    fn test_fewer_leads_than_block_size() {
        assert!(recent_inquiries(&[]).is_empty());
        assert_eq!(recent_inquiries(&[lead(1, "new", None)]).len(), 1);
    }

    #[test]
    fn test_serializes_camel_case() {
        let value = serde_json::to_value(recent_inquiries(&[lead(9, "new", None)])).unwrap();
        assert_eq!(value[0]["inquiryId"], 9);
        assert_eq!(value[0]["customer"], "lead 9");
        assert_eq!(value[0]["status"], "new");
        assert_eq!(value[0]["priority"], "medium");
    }
}
