//! Objective trigger zones, the intro message and the completion trigger.

use forge_config::GeneratorSettings;
use forge_core::Side;
use forge_mission::{Briefing, Trigger, TriggerAction, TriggerCondition, TriggerZone};

use super::Ids;
use super::placement::ObjectiveSite;

const INTRO_DELAY_S: u32 = 5;
const MESSAGE_DURATION_S: u32 = 20;

pub fn build(
    sites: &[ObjectiveSite],
    briefing: &Briefing,
    player_side: Side,
    settings: &GeneratorSettings,
    ids: &mut Ids,
) -> (Vec<TriggerZone>, Vec<Trigger>) {
    let zones = sites
        .iter()
        .map(|site| TriggerZone {
            id: ids.zone(),
            name: site.name.clone(),
            position: site.position,
            radius_m: if site.radius_m > 0.0 {
                site.radius_m
            } else {
                settings.objective_zone_radius_m
            },
        })
        .collect();

    let intro_text = match briefing.objectives.first() {
        Some(first) if briefing.objectives.len() == 1 => format!("{}\n{first}", briefing.name),
        _ => format!(
            "{}\n{} objective(s) assigned, see the briefing.",
            briefing.name,
            briefing.objectives.len()
        ),
    };
    let triggers = vec![
        Trigger {
            name: "Mission intro".to_string(),
            condition: TriggerCondition::TimeMoreThan {
                seconds: INTRO_DELAY_S,
            },
            actions: vec![TriggerAction::Message {
                text: intro_text,
                seconds: MESSAGE_DURATION_S,
            }],
        },
        Trigger {
            name: "Mission complete".to_string(),
            condition: TriggerCondition::GroupsDead {
                groups: sites.iter().map(|site| site.target_group).collect(),
            },
            actions: vec![
                TriggerAction::Message {
                    text: "All objectives destroyed. Return to base.".to_string(),
                    seconds: MESSAGE_DURATION_S,
                },
                TriggerAction::EndMission {
                    winner: player_side,
                },
            ],
        },
    ];
    (zones, triggers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::coords::Coordinates;

    fn briefing(objectives: &[&str]) -> Briefing {
        Briefing {
            name: "Operation Test".to_string(),
            description: String::new(),
            objectives: objectives.iter().map(|o| o.to_string()).collect(),
            flights: Vec::new(),
            remarks: Vec::new(),
            html: String::new(),
        }
    }

    #[test]
    fn one_zone_per_objective_and_completion_on_all_targets() {
        let sites: Vec<_> = (1..=3)
            .map(|n| ObjectiveSite {
                name: format!("Site {n}"),
                position: Coordinates::new(n as f64, 0.0),
                radius_m: 0.0,
                target_group: n * 10,
                target_units: 2,
            })
            .collect();
        let mut ids = Ids::default();
        let (zones, triggers) = build(
            &sites,
            &briefing(&["a", "b", "c"]),
            Side::Red,
            &GeneratorSettings::default(),
            &mut ids,
        );
        assert_eq!(zones.iter().map(|z| z.id).collect::<Vec<_>>(), [1, 2, 3]);
        assert_eq!(zones[0].radius_m, 1_500.0);
        assert_eq!(
            triggers[1].condition,
            TriggerCondition::GroupsDead {
                groups: vec![10, 20, 30]
            }
        );
        assert_eq!(
            triggers[1].actions[1],
            TriggerAction::EndMission { winner: Side::Red }
        );
    }

    #[test]
    fn single_objective_intro_quotes_it() {
        let (_, triggers) = build(
            &[],
            &briefing(&["Destroy the convoy"]),
            Side::Blue,
            &GeneratorSettings::default(),
            &mut Ids::default(),
        );
        let TriggerAction::Message { text, .. } = &triggers[0].actions[0] else {
            panic!("intro is a message");
        };
        assert_eq!(text, "Operation Test\nDestroy the convoy");
    }
}
