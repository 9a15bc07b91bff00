//! Maps fired risk factors to intervention plans.
//!
//! Each category yields at most one plan, in the order attendance,
//! academic, financial, socioeconomic. Three or more distinct factors add
//! a multi-disciplinary team plan on top of the category plans.

use std::collections::BTreeSet;

use crate::models::{InterventionCategory, InterventionPlan, Priority, RiskFactor};

/// Number of distinct factors that calls for the team plan.
pub const COMPREHENSIVE_FACTOR_COUNT: usize = 3;

const ATTENDANCE_PLAN: InterventionPlan = InterventionPlan {
    category: InterventionCategory::Attendance,
    priority: Priority::High,
    title: "Mentor Intervention - Attendance",
    description: "Assign dedicated mentor to work closely with student on attendance patterns and underlying issues.",
    assigned_role: "Student Mentor",
    action_steps: &[
        "Schedule one-on-one meeting with student within 48 hours",
        "Identify root causes of absenteeism (transportation, health, family issues)",
        "Create personalized attendance improvement plan",
        "Set up daily check-ins for first week",
        "Coordinate with parents for home-school communication",
    ],
};

const ACADEMIC_PLAN: InterventionPlan = InterventionPlan {
    category: InterventionCategory::Academic,
    priority: Priority::High,
    title: "Subject Teacher Support",
    description: "Direct intervention by subject teachers to address specific academic challenges and knowledge gaps.",
    assigned_role: "Subject Teacher",
    action_steps: &[
        "Conduct diagnostic assessment to identify specific learning gaps",
        "Develop individualized learning plan with measurable goals",
        "Arrange after-school tutoring sessions 2x per week",
        "Provide alternative learning materials and methods",
        "Weekly progress monitoring with feedback to student and parents",
    ],
};

const FINANCIAL_PLAN: InterventionPlan = InterventionPlan {
    category: InterventionCategory::Financial,
    priority: Priority::Medium,
    title: "Financial Counselor Support",
    description: "Connect family with financial resources and develop sustainable payment solutions.",
    assigned_role: "Financial Counselor",
    action_steps: &[
        "Schedule confidential meeting with family within 3 days",
        "Assess family's financial situation and available resources",
        "Apply for available scholarships and financial aid programs",
        "Set up manageable payment plan with school administration",
        "Connect with community resources for additional support",
    ],
};

const SOCIOECONOMIC_PLAN: InterventionPlan = InterventionPlan {
    category: InterventionCategory::SocioeconomicSupport,
    priority: Priority::Medium,
    title: "School Counselor - Holistic Support",
    description: "Comprehensive support addressing social, emotional, and environmental factors affecting student success.",
    assigned_role: "School Counselor",
    action_steps: &[
        "Complete comprehensive needs assessment",
        "Coordinate with social services if needed",
        "Establish peer support group participation",
        "Connect family with community resources (food bank, healthcare)",
        "Monitor student's social-emotional wellbeing weekly",
    ],
};

const TEAM_PLAN: InterventionPlan = InterventionPlan {
    category: InterventionCategory::Comprehensive,
    priority: Priority::High,
    title: "Multi-Disciplinary Team Approach",
    description: "Coordinate comprehensive intervention involving multiple specialists for high-risk students.",
    assigned_role: "Student Success Team",
    action_steps: &[
        "Convene emergency student success team meeting within 24 hours",
        "Assign case manager to coordinate all interventions",
        "Develop comprehensive intervention plan with timeline",
        "Schedule weekly team meetings to monitor progress",
        "Establish crisis intervention protocol if needed",
    ],
};

pub fn plan_for(category: InterventionCategory) -> InterventionPlan {
    match category {
        InterventionCategory::Attendance => ATTENDANCE_PLAN,
        InterventionCategory::Academic => ACADEMIC_PLAN,
        InterventionCategory::Financial => FINANCIAL_PLAN,
        InterventionCategory::SocioeconomicSupport => SOCIOECONOMIC_PLAN,
        InterventionCategory::Comprehensive => TEAM_PLAN,
    }
}

pub fn recommend(factors: &[RiskFactor]) -> Vec<InterventionPlan> {
    let distinct: BTreeSet<RiskFactor> = factors.iter().copied().collect();
    let categories: BTreeSet<InterventionCategory> =
        distinct.iter().map(|factor| factor.category()).collect();

    let mut plans: Vec<InterventionPlan> = categories.into_iter().map(plan_for).collect();
    if distinct.len() >= COMPREHENSIVE_FACTOR_COUNT {
        plans.push(plan_for(InterventionCategory::Comprehensive));
    }
    plans
}
