//! Seed data - the demo farm loaded at startup
//!
//! Robots and cows are mutated in place afterwards; sessions are static.

use crate::domain::{Cow, Health, Location, MilkingSession, Quality, Robot, RobotStatus};

pub fn robots() -> Vec<Robot> {
    vec![
        Robot {
            id: "R001".into(),
            name: "Robot Alpha".into(),
            status: RobotStatus::Active,
            current_cow: Some("C123".into()),
            last_maintenance: "2025-01-14".into(),
            sessions_today: 18,
        },
        Robot {
            id: "R002".into(),
            name: "Robot Beta".into(),
            status: RobotStatus::Idle,
            current_cow: None,
            last_maintenance: "2025-01-13".into(),
            sessions_today: 22,
        },
        Robot {
            id: "R003".into(),
            name: "Robot Gamma".into(),
            status: RobotStatus::Maintenance,
            current_cow: None,
            last_maintenance: "2025-01-12".into(),
            sessions_today: 15,
        },
        Robot {
            id: "R004".into(),
            name: "Robot Delta".into(),
            status: RobotStatus::Error,
            current_cow: None,
            last_maintenance: "2025-01-11".into(),
            sessions_today: 8,
        },
    ]
}

pub fn cows() -> Vec<Cow> {
    vec![
        Cow {
            id: "C123".into(),
            name: "Burenka".into(),
            tag_id: "TAG-001".into(),
            last_milking: "14:30".into(),
            daily_yield: 28.5,
            avg_yield: 26.2,
            health: Health::Excellent,
            location: Location::Milking,
        },
        Cow {
            id: "C124".into(),
            name: "Zorka".into(),
            tag_id: "TAG-002".into(),
            last_milking: "13:45".into(),
            daily_yield: 31.2,
            avg_yield: 29.8,
            health: Health::Good,
            location: Location::Waiting,
        },
        Cow {
            id: "C125".into(),
            name: "Nochka".into(),
            tag_id: "TAG-003".into(),
            last_milking: "12:20".into(),
            daily_yield: 24.8,
            avg_yield: 25.1,
            health: Health::Attention,
            location: Location::Pasture,
        },
        Cow {
            id: "C126".into(),
            name: "Mayka".into(),
            tag_id: "TAG-004".into(),
            last_milking: "11:15".into(),
            daily_yield: 33.1,
            avg_yield: 31.4,
            health: Health::Excellent,
            location: Location::Waiting,
        },
    ]
}

pub fn sessions() -> Vec<MilkingSession> {
    vec![
        MilkingSession {
            id: "S001".into(),
            cow_id: "C123".into(),
            robot_id: "R001".into(),
            start_time: "14:30".into(),
            duration: 8,
            yield_litres: 12.5,
            quality: Quality::Excellent,
        },
        MilkingSession {
            id: "S002".into(),
            cow_id: "C124".into(),
            robot_id: "R002".into(),
            start_time: "13:45".into(),
            duration: 7,
            yield_litres: 13.8,
            quality: Quality::Excellent,
        },
        MilkingSession {
            id: "S003".into(),
            cow_id: "C125".into(),
            robot_id: "R001".into(),
            start_time: "12:20".into(),
            duration: 9,
            yield_litres: 11.2,
            quality: Quality::Good,
        },
        MilkingSession {
            id: "S004".into(),
            cow_id: "C126".into(),
            robot_id: "R004".into(),
            start_time: "11:15".into(),
            duration: 6,
            yield_litres: 14.1,
            quality: Quality::Excellent,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Location, RobotStatus};

    #[test]
    fn seed_shapes() {
        assert_eq!(robots().len(), 4);
        assert_eq!(cows().len(), 4);
        assert_eq!(sessions().len(), 4);
    }

    #[test]
    fn seed_has_waiting_cows() {
        let waiting: Vec<_> = cows()
            .into_iter()
            .filter(|c| c.location == Location::Waiting)
            .collect();
        assert_eq!(waiting.len(), 2);
        assert_eq!(waiting[0].id, "C124");
    }

    #[test]
    fn only_active_robot_holds_a_cow() {
        for robot in robots() {
            if robot.current_cow.is_some() {
                assert_eq!(robot.status, RobotStatus::Active);
            }
        }
    }
}
