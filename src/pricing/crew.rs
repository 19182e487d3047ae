//! Crew size and labor hours.

use crate::domain::estimate::{Computed, EstimateMethod};
use crate::domain::rates::{MoverAssignmentRule, MoverTeam, RateContext};
use crate::pricing::PricingError;

/// Upper bound on team switches while hours and crew size settle.
pub const MAX_CREW_ITERATIONS: usize = 5;

/// Round hours up to the next quarter hour.
pub fn quarter_hours(hours: f64) -> f64 {
    (hours * 4.0).ceil() / 4.0
}

/// Hours `team` needs to move `weight` pounds.
pub fn hours_for(weight: f64, team: &MoverTeam) -> f64 {
    if team.lbs_per_hour > 0.0 {
        quarter_hours(weight / team.lbs_per_hour)
    } else {
        0.0
    }
}

/// First rule whose `(hours_min, hours_max]` range contains `hours`.
pub fn rule_for(hours: f64, rules: &[MoverAssignmentRule]) -> Option<&MoverAssignmentRule> {
    rules.iter().find(|rule| rule.contains(hours))
}

/// Team with exactly `movers` people, else the smallest larger team, else the
/// largest one. `teams` must be sorted by size and non-empty.
pub fn team_for(teams: &[MoverTeam], movers: i32) -> &MoverTeam {
    teams
        .iter()
        .find(|team| team.number_of_movers >= movers)
        .unwrap_or(&teams[teams.len() - 1])
}

/// Inputs of the crew sizing step.
#[derive(Debug, Clone, Copy)]
pub struct CrewRequest {
    pub method: EstimateMethod,
    /// Effective total weight in pounds.
    pub weight: f64,
    /// Current hours, pinned or derived.
    pub hours: Computed<f64>,
    /// Current crew size, pinned or derived.
    pub movers: Computed<i32>,
    /// Largest crew any selected service needs.
    pub required_movers: i32,
}

/// Outcome of the crew sizing step.
#[derive(Debug, Clone, PartialEq)]
pub struct CrewPlan {
    /// Team whose rates price the labor.
    pub team: MoverTeam,
    pub number_of_movers: i32,
    pub estimated_hours: f64,
    /// Rounds of the convergence loop; zero when the crew was pinned.
    pub iterations: usize,
}

/// Pick the crew and the labor hours.
pub fn plan_crew(request: &CrewRequest, rates: &RateContext) -> Result<CrewPlan, PricingError> {
    let mut teams = rates.mover_teams.clone();
    teams.sort_by_key(|team| team.number_of_movers);
    if teams.is_empty() {
        return Err(PricingError::InsufficientData(
            "no mover teams are configured".to_string(),
        ));
    }

    // Hourly billing only trusts hours an operator entered; an auto value is
    // a leftover of an earlier weight-driven run.
    let weight_driven = request.method.is_weight_driven();
    if !weight_driven && !(request.hours.is_manual() && request.hours.value() > 0.0) {
        return Err(PricingError::InsufficientData(
            "hourly estimates need entered hours".to_string(),
        ));
    }

    let hours_with = |team: &MoverTeam| match request.hours {
        Computed::Auto(_) if weight_driven => hours_for(request.weight, team),
        hours => hours.value(),
    };

    if let Computed::Manual(movers) = request.movers {
        let team = team_for(&teams, movers).clone();
        let estimated_hours = hours_with(&team);
        return Ok(CrewPlan {
            team,
            number_of_movers: movers,
            estimated_hours,
            iterations: 0,
        });
    }

    let (mut team, mut estimated_hours, iterations) = match request.hours {
        Computed::Auto(_) if weight_driven => converge(request.weight, &teams, rates),
        hours => {
            let team = rule_for(hours.value(), &rates.assignment_rules)
                .map(|rule| team_for(&teams, rule.number_of_movers))
                .unwrap_or(&teams[0]);
            (team.clone(), hours.value(), 1)
        }
    };

    if request.required_movers > team.number_of_movers {
        let larger = team_for(&teams, request.required_movers);
        if larger.number_of_movers > team.number_of_movers {
            team = larger.clone();
            estimated_hours = hours_with(&team);
        }
    }

    let number_of_movers = team.number_of_movers.max(request.required_movers);
    Ok(CrewPlan {
        team,
        number_of_movers,
        estimated_hours,
        iterations,
    })
}

/// Alternate between hours and the recommended team until the team stops
/// changing or the iteration cap is hit; the last computed pair wins.
fn converge(
    weight: f64,
    teams: &[MoverTeam],
    rates: &RateContext,
) -> (MoverTeam, f64, usize) {
    let mut team = &teams[0];
    let mut iterations = 0;
    loop {
        iterations += 1;
        let hours = hours_for(weight, team);
        let Some(rule) = rule_for(hours, &rates.assignment_rules) else {
            return (team.clone(), hours, iterations);
        };
        let next = team_for(teams, rule.number_of_movers);
        if next.number_of_movers == team.number_of_movers || iterations >= MAX_CREW_ITERATIONS {
            return (team.clone(), hours, iterations);
        }
        team = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::hub::DEFAULT_TRUCK_RATE;

    fn team(number_of_movers: i32, lbs_per_hour: f64, price_per_hour: f64) -> MoverTeam {
        MoverTeam {
            id: number_of_movers,
            hub_id: 1,
            number_of_movers,
            lbs_per_hour,
            price_per_hour,
        }
    }

    fn rule(hours_min: f64, hours_max: Option<f64>, number_of_movers: i32) -> MoverAssignmentRule {
        MoverAssignmentRule {
            id: 1,
            hub_id: 1,
            hours_min,
            hours_max,
            number_of_movers,
        }
    }

    fn rates(teams: Vec<MoverTeam>, rules: Vec<MoverAssignmentRule>) -> RateContext {
        RateContext {
            mover_teams: teams,
            assignment_rules: rules,
            trucks: Vec::new(),
            fuel_tiers: Vec::new(),
            additional_services: Vec::new(),
            truck_rate: DEFAULT_TRUCK_RATE,
        }
    }

    fn request(weight: f64) -> CrewRequest {
        CrewRequest {
            method: EstimateMethod::Inventory,
            weight,
            hours: Computed::Auto(0.0),
            movers: Computed::Auto(0),
            required_movers: 0,
        }
    }

    #[test]
    fn quarter_hours_round_up() {
        assert_eq!(quarter_hours(26.666), 26.75);
        assert_eq!(quarter_hours(4.0), 4.0);
        assert_eq!(quarter_hours(4.01), 4.25);
    }

    #[test]
    fn crew_switches_to_recommended_team() {
        let rates = rates(
            vec![team(3, 150.0, 110.0), team(2, 100.0, 80.0)],
            vec![rule(6.0, None, 3)],
        );
        let plan = plan_crew(&request(4000.0), &rates).unwrap();
        assert_eq!(plan.number_of_movers, 3);
        assert_eq!(plan.estimated_hours, 26.75);
        assert_eq!(plan.team.price_per_hour, 110.0);
        assert_eq!(plan.iterations, 2);
    }

    #[test]
    fn small_move_keeps_smallest_team() {
        let rates = rates(
            vec![team(2, 100.0, 80.0), team(3, 150.0, 110.0)],
            vec![rule(6.0, None, 3)],
        );
        let plan = plan_crew(&request(500.0), &rates).unwrap();
        assert_eq!(plan.number_of_movers, 2);
        assert_eq!(plan.estimated_hours, 5.0);
        assert_eq!(plan.iterations, 1);
    }

    #[test]
    fn oscillating_rules_stop_at_cap() {
        // 2 movers need 10h -> rule says 4; 4 movers need 5h -> rule says 2.
        let rates = rates(
            vec![team(2, 100.0, 80.0), team(4, 200.0, 150.0)],
            vec![rule(0.0, Some(6.0), 2), rule(6.0, None, 4)],
        );
        let plan = plan_crew(&request(1000.0), &rates).unwrap();
        assert_eq!(plan.iterations, MAX_CREW_ITERATIONS);
        assert!(plan.number_of_movers == 2 || plan.number_of_movers == 4);
    }

    #[test]
    fn services_can_force_a_larger_crew() {
        let rates = rates(
            vec![team(2, 100.0, 80.0), team(3, 150.0, 110.0)],
            vec![rule(6.0, None, 3)],
        );
        let mut request = request(300.0);
        request.required_movers = 3;
        let plan = plan_crew(&request, &rates).unwrap();
        assert_eq!(plan.number_of_movers, 3);
        assert_eq!(plan.estimated_hours, 2.0);

        request.required_movers = 6;
        let plan = plan_crew(&request, &rates).unwrap();
        assert_eq!(plan.number_of_movers, 6);
        assert_eq!(plan.team.number_of_movers, 3);
    }

    #[test]
    fn pinned_movers_skip_the_loop() {
        let rates = rates(
            vec![team(2, 100.0, 80.0), team(3, 150.0, 110.0)],
            vec![rule(6.0, None, 3)],
        );
        let mut request = request(4000.0);
        request.movers = Computed::Manual(2);
        let plan = plan_crew(&request, &rates).unwrap();
        assert_eq!(plan.number_of_movers, 2);
        assert_eq!(plan.estimated_hours, 40.0);
        assert_eq!(plan.iterations, 0);
    }

    #[test]
    fn hourly_uses_given_hours() {
        let rates = rates(
            vec![team(2, 100.0, 80.0), team(3, 150.0, 110.0)],
            vec![rule(6.0, None, 3)],
        );
        let mut request = request(0.0);
        request.method = EstimateMethod::Hourly;
        request.hours = Computed::Manual(8.0);
        let plan = plan_crew(&request, &rates).unwrap();
        assert_eq!(plan.number_of_movers, 3);
        assert_eq!(plan.estimated_hours, 8.0);

        request.hours = Computed::Manual(0.0);
        assert!(matches!(
            plan_crew(&request, &rates),
            Err(PricingError::InsufficientData(_))
        ));
    }

    #[test]
    fn hourly_ignores_hours_left_by_a_weight_run() {
        let rates = rates(vec![team(2, 100.0, 80.0)], Vec::new());
        let mut request = request(0.0);
        request.method = EstimateMethod::Hourly;
        request.hours = Computed::Auto(12.5);
        assert!(matches!(
            plan_crew(&request, &rates),
            Err(PricingError::InsufficientData(_))
        ));
    }

    #[test]
    fn missing_teams_is_insufficient_data() {
        let rates = rates(Vec::new(), Vec::new());
        assert!(matches!(
            plan_crew(&request(1000.0), &rates),
            Err(PricingError::InsufficientData(_))
        ));
    }

    #[test]
    fn team_lookup_prefers_exact_then_larger_then_largest() {
        let teams = vec![team(2, 100.0, 80.0), team(4, 200.0, 150.0)];
        assert_eq!(team_for(&teams, 2).number_of_movers, 2);
        assert_eq!(team_for(&teams, 3).number_of_movers, 4);
        assert_eq!(team_for(&teams, 9).number_of_movers, 4);
        assert_eq!(team_for(&teams, 0).number_of_movers, 2);
    }
}
