use super::{DropEntry, Multiplier, TemplateOutcome};
use crate::vision::TemplateRole;

/// Divides each ordinary item's raw quantity by the run multiplier.
///
/// Entries keep the library enumeration order. The multiplier-source item and
/// skipped templates produce no entry.
pub fn normalize_drops(outcomes: &[TemplateOutcome<'_>], multiplier: Multiplier) -> Vec<DropEntry> {
    outcomes
        .iter()
        .filter(|outcome| outcome.template.role == TemplateRole::Ordinary)
        .filter_map(|outcome| outcome.result.as_ref().ok().map(|reading| (outcome, reading)))
        .map(|(outcome, reading)| DropEntry {
            item: outcome.template.name.clone(),
            normalized_amount: reading.amount as f64 / multiplier.value(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SkipReason;
    use crate::pipeline::QuantityReading;
    use crate::vision::{MatchCandidate, TemplateDescriptor};
    use image::GrayImage;

    fn template(name: &str, role: TemplateRole) -> TemplateDescriptor {
        TemplateDescriptor {
            name: name.to_string(),
            pixels: GrayImage::new(4, 4),
            role,
        }
    }

    fn read<'a>(template: &'a TemplateDescriptor, amount: u32) -> TemplateOutcome<'a> {
        TemplateOutcome {
            template,
            result: Ok(QuantityReading {
                candidate: MatchCandidate { template, top_left: (0, 0), confidence: 0.9 },
                text: amount.to_string(),
                amount,
            }),
        }
    }

    #[test]
    fn test_amounts_divided_by_multiplier() {
        let gem = template("gem", TemplateRole::Ordinary);
        let source = template("style_point", TemplateRole::MultiplierSource);
        let outcomes = vec![read(&gem, 10), read(&source, 400)];

        let multiplier = Multiplier::from_amount(400, 200.0).unwrap();
        let drops = normalize_drops(&outcomes, multiplier);

        assert_eq!(
            drops,
            vec![DropEntry { item: "gem".to_string(), normalized_amount: 5.0 }]
        );
    }

    #[test]
    fn test_every_entry_is_raw_over_multiplier() {
        let names = ["a", "b", "c", "d"];
        let templates: Vec<TemplateDescriptor> =
            names.iter().map(|n| template(n, TemplateRole::Ordinary)).collect();
        let amounts = [0u32, 1, 7, 250];
        let outcomes: Vec<TemplateOutcome> =
            templates.iter().zip(amounts).map(|(t, a)| read(t, a)).collect();

        for raw_base in [50u32, 200, 333, 1000] {
            let multiplier = Multiplier::from_amount(raw_base, 200.0).unwrap();
            let drops = normalize_drops(&outcomes, multiplier);
            assert_eq!(drops.len(), 4);
            for (drop, amount) in drops.iter().zip(amounts) {
                assert_eq!(drop.normalized_amount, amount as f64 / multiplier.value());
                assert!(drop.normalized_amount >= 0.0);
            }
        }
    }

    #[test]
    fn test_skipped_templates_produce_no_entry() {
        let gem = template("gem", TemplateRole::Ordinary);
        let coin = template("coin", TemplateRole::Ordinary);
        let outcomes = vec![
            TemplateOutcome {
                template: &coin,
                result: Err(SkipReason::UnreadableQuantity { text: String::new() }),
            },
            read(&gem, 3),
        ];

        let drops = normalize_drops(&outcomes, Multiplier::BASELINE);
        assert_eq!(drops.len(), 1);
        assert_eq!(drops[0].item, "gem");
        assert_eq!(drops[0].normalized_amount, 3.0);
    }
}
