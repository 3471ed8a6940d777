//! Hardcoded demo profile, renewal calendar and task templates.
//!
//! This text is injected into the model's context and searched by the profile
//! tools, so the concierge needs no external store.

use serde::Serialize;

pub const USER_PROFILE: &str = r#"
=== IDENTITY DOCUMENTS ===

DRIVER'S LICENSE:
  - License Number: D99887766
  - State: California (CA)
  - Issue Date: 2021-12-15
  - Expiration Date: 2025-12-15
  - Class: C (Standard)
  - Address on file: 123 Main Street, San Francisco, CA 94102

PASSPORT:
  - Passport Number: P11223344
  - Country: United States
  - Issue Date: 2019-05-20
  - Expiration Date: 2029-05-20
  - Place of Issue: San Francisco Passport Agency

SOCIAL SECURITY:
  - Last 4 digits: XXX-XX-4567 (full number secured)

=== INSURANCE POLICIES ===

AUTO INSURANCE:
  - Provider: Geico
  - Policy Number: 999-000-1234
  - Coverage: Full Coverage
  - Premium: $150/month
  - Expiration Date: 2024-12-01 (NEEDS RENEWAL!)
  - Vehicles Covered: 2020 Toyota Camry (VIN: 1HGBH41JXMN109186)

HEALTH INSURANCE:
  - Provider: Blue Shield of California
  - Policy Number: BSC-789456
  - Plan: PPO Gold
  - Premium: $450/month (employer subsidized)
  - Member ID: 123456789

RENTERS INSURANCE:
  - Provider: Lemonade
  - Policy Number: LEM-2024-5678
  - Coverage: $30,000 personal property
  - Premium: $15/month
  - Expiration Date: 2025-03-15

=== PERSONAL INFORMATION ===

NAME: John Michael Doe
DATE OF BIRTH: May 15, 1990
EMAIL: johndoe@email.com
PHONE: +1 (555) 123-4567
ADDRESS:
  123 Main Street, Apt 4B
  San Francisco, CA 94102

EMERGENCY CONTACT:
  - Name: Jane Doe (Sister)
  - Phone: +1 (555) 987-6543
  - Relationship: Sibling

=== PREFERENCES ===

WORK SCHEDULE:
  - Work Hours: 9:00 AM - 5:00 PM PST
  - Work Days: Monday - Friday
  - Lunch Break: 12:00 PM - 1:00 PM

ENERGY PATTERNS:
  - Morning (6-10 AM): LOW energy - prefer easy tasks
  - Mid-day (10 AM - 2 PM): HIGH energy - good for deep work
  - Afternoon (2-6 PM): MEDIUM energy - meetings okay
  - Evening (6+ PM): LOW energy - wind down

COMMUNICATION PREFERENCES:
  - Preferred: Email
  - Secondary: Text message
  - Do not disturb: 10 PM - 7 AM
"#;

pub const RENEWAL_REMINDERS: &str = r#"
=== UPCOMING RENEWALS & DEADLINES ===

🔴 URGENT (Within 7 days):
  1. Car Insurance (Geico)
     - Expires: December 01, 2024
     - Status: OVERDUE - Needs immediate attention!
     - Action: Call Geico at 1-800-861-8380 or renew online
     - Estimated cost: $1,800/year

🟡 SOON (Within 30 days):
  2. Driver's License
     - Expires: December 15, 2025
     - Status: 15 days remaining
     - Action: Schedule DMV appointment or renew online at dmv.ca.gov
     - Fee: ~$38

  3. Netflix Subscription
     - Renews: December 05, 2025
     - Status: Auto-renewal ON
     - Monthly cost: $15.49

🟢 UPCOMING (30-90 days):
  4. Gym Membership (24 Hour Fitness)
     - Renews: January 01, 2026
     - Status: Annual renewal
     - Cost: $500/year
     - Note: Consider negotiating rate or switching gyms

  5. Renters Insurance (Lemonade)
     - Expires: March 15, 2025
     - Status: 105 days remaining
     - Action: Review coverage before renewal

✅ FAR OUT (90+ days):
  6. Passport
     - Expires: May 20, 2029
     - Status: Good for 4+ years
     - No action needed

=== RECURRING BILLS ===

MONTHLY:
  - Rent: $2,500 (due 1st of month)
  - Utilities: ~$150 (auto-pay)
  - Phone: $85 (T-Mobile, auto-pay)
  - Internet: $60 (Comcast, auto-pay)
  - Spotify: $10.99 (auto-pay)
  - iCloud: $2.99 (auto-pay)

ANNUAL:
  - Amazon Prime: $139 (renews July)
  - Domain renewal: $15 (renews September)
"#;

/// A checklist for a recurring life-admin chore.
#[derive(Debug, Clone, Serialize)]
pub struct TaskTemplate {
    pub title: &'static str,
    pub steps: &'static [&'static str],
    pub estimated_time: &'static str,
}

pub const TASK_TEMPLATES: &[(&str, TaskTemplate)] = &[
    (
        "license_renewal",
        TaskTemplate {
            title: "Renew Driver's License",
            steps: &[
                "Check if eligible for online renewal at dmv.ca.gov",
                "If not, schedule DMV appointment",
                "Gather required documents (current license, proof of residency)",
                "Pay renewal fee (~$38)",
                "Receive temporary license, wait for permanent",
            ],
            estimated_time: "1-2 hours (online) or 2-4 hours (in-person)",
        },
    ),
    (
        "insurance_renewal",
        TaskTemplate {
            title: "Renew Auto Insurance",
            steps: &[
                "Review current coverage and premium",
                "Get quotes from 2-3 competitors",
                "Decide to renew or switch",
                "Complete renewal/new policy online or by phone",
                "Update payment method if needed",
                "Print new insurance card for car",
            ],
            estimated_time: "1-2 hours",
        },
    ),
    (
        "travel_prep",
        TaskTemplate {
            title: "Travel Preparation Checklist",
            steps: &[
                "Check passport expiration (6+ months validity required)",
                "Book flights and accommodation",
                "Arrange pet/plant care if needed",
                "Set up mail hold with USPS",
                "Notify bank of travel dates",
                "Check health insurance coverage abroad",
                "Pack essentials and medications",
                "Share itinerary with emergency contact",
            ],
            estimated_time: "2-4 hours",
        },
    ),
    (
        "doctor_visit",
        TaskTemplate {
            title: "Doctor Visit Preparation",
            steps: &[
                "Confirm appointment date and time",
                "Review and update symptoms list",
                "List current medications",
                "Prepare questions for doctor",
                "Bring insurance card and ID",
                "Arrange transportation if needed",
            ],
            estimated_time: "30 minutes prep",
        },
    ),
];

pub fn task_template(kind: &str) -> Option<&'static TaskTemplate> {
    TASK_TEMPLATES
        .iter()
        .find(|(name, _)| *name == kind)
        .map(|(_, template)| template)
}

pub fn template_names() -> Vec<&'static str> {
    TASK_TEMPLATES.iter().map(|(name, _)| *name).collect()
}

/// Condensed profile for quick reference.
pub fn profile_summary() -> &'static str {
    r#"Quick Profile Summary:
- Name: John Doe
- License #: D99887766 (exp: Dec 15, 2025)
- Passport #: P11223344 (exp: May 20, 2029)
- Auto Insurance: Geico #999-000-1234 (EXPIRED - needs renewal!)
- Email: johndoe@email.com
- Phone: +1 (555) 123-4567"#
}

#[derive(Debug, Clone, Serialize)]
pub struct UrgentItem {
    pub item: &'static str,
    pub status: &'static str,
    pub action: &'static str,
    pub priority: &'static str,
}

impl UrgentItem {
    pub fn needs_action(&self) -> bool {
        matches!(self.priority, "CRITICAL" | "HIGH")
    }
}

/// Items needing immediate attention.
pub fn urgent_items() -> Vec<UrgentItem> {
    vec![
        UrgentItem {
            item: "Car Insurance",
            status: "OVERDUE",
            action: "Renew immediately",
            priority: "CRITICAL",
        },
        UrgentItem {
            item: "Driver's License",
            status: "Expires in 15 days",
            action: "Schedule renewal",
            priority: "HIGH",
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenewalTier {
    Urgent,
    Soon,
    Upcoming,
    FarOut,
}

impl RenewalTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenewalTier::Urgent => "urgent",
            RenewalTier::Soon => "soon",
            RenewalTier::Upcoming => "upcoming",
            RenewalTier::FarOut => "far_out",
        }
    }
}

/// One entry of the renewal calendar, mirroring `RENEWAL_REMINDERS`.
#[derive(Debug, Clone, Serialize)]
pub struct RenewalEntry {
    pub item: &'static str,
    pub due: &'static str,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<&'static str>,
    pub tier: RenewalTier,
}

pub fn renewal_calendar() -> Vec<RenewalEntry> {
    vec![
        RenewalEntry {
            item: "Car Insurance (Geico)",
            due: "2024-12-01",
            status: "OVERDUE - Needs immediate attention!",
            action: Some("Call Geico at 1-800-861-8380 or renew online"),
            cost: Some("$1,800/year"),
            tier: RenewalTier::Urgent,
        },
        RenewalEntry {
            item: "Driver's License",
            due: "2025-12-15",
            status: "15 days remaining",
            action: Some("Schedule DMV appointment or renew online at dmv.ca.gov"),
            cost: Some("~$38"),
            tier: RenewalTier::Soon,
        },
        RenewalEntry {
            item: "Netflix Subscription",
            due: "2025-12-05",
            status: "Auto-renewal ON",
            action: None,
            cost: Some("$15.49/month"),
            tier: RenewalTier::Soon,
        },
        RenewalEntry {
            item: "Gym Membership (24 Hour Fitness)",
            due: "2026-01-01",
            status: "Annual renewal",
            action: Some("Consider negotiating rate or switching gyms"),
            cost: Some("$500/year"),
            tier: RenewalTier::Upcoming,
        },
        RenewalEntry {
            item: "Renters Insurance (Lemonade)",
            due: "2025-03-15",
            status: "105 days remaining",
            action: Some("Review coverage before renewal"),
            cost: None,
            tier: RenewalTier::Upcoming,
        },
        RenewalEntry {
            item: "Passport",
            due: "2029-05-20",
            status: "Good for 4+ years",
            action: None,
            cost: None,
            tier: RenewalTier::FarOut,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_contains_key_documents() {
        assert!(USER_PROFILE.contains("D99887766"));
        assert!(USER_PROFILE.contains("P11223344"));
        assert!(USER_PROFILE.contains("999-000-1234"));
    }

    #[test]
    fn summary_agrees_with_profile() {
        for number in ["D99887766", "P11223344", "999-000-1234"] {
            assert!(profile_summary().contains(number));
            assert!(USER_PROFILE.contains(number));
        }
    }

    #[test]
    fn two_urgent_items_need_action() {
        let items = urgent_items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].priority, "CRITICAL");
        assert_eq!(items[1].item, "Driver's License");
        assert!(items.iter().all(UrgentItem::needs_action));
    }

    #[test]
    fn template_lookup() {
        assert_eq!(task_template("travel_prep").unwrap().steps.len(), 8);
        assert!(task_template("moving").is_none());
        assert_eq!(
            template_names(),
            vec!["license_renewal", "insurance_renewal", "travel_prep", "doctor_visit"]
        );
    }

    #[test]
    fn renewal_calendar_has_every_tier() {
        let calendar = renewal_calendar();
        assert_eq!(calendar.len(), 6);
        assert_eq!(calendar[0].tier, RenewalTier::Urgent);
        assert_eq!(calendar[5].tier, RenewalTier::FarOut);
        assert!(RENEWAL_REMINDERS.contains("Passport"));
    }
}
