//! Rapport de réduction
//!
//! Met en forme un [`TraverseResult`] pour le bureau : tableau des côtés,
//! fermeture, classe de précision et décision terrain. Produit aussi
//! l'instantané d'exactitude consommé par le service d'analyse externe.

use serde::Serialize;

use cheminement::{decimal_to_dms, ReductionWarning, TraverseResult, TraverseType};

use crate::fieldbook::SkippedRow;

/// Classes de précision des cheminements d'ingénierie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SurveyClass {
    /// Mieux que 1:25 000
    FirstOrder,
    /// Mieux que 1:10 000
    SecondOrder,
    /// Mieux que 1:5 000
    ThirdOrder,
    /// Mieux que 1:2 500
    FourthOrder,
    /// En dessous de toute classe
    BelowSpec,
    /// Cheminement ouvert : pas de fermeture à classer
    Unclassified,
}

impl SurveyClass {
    /// Classe une précision relative `1:N`
    pub fn from_precision(precision: f64) -> Self {
        if precision >= 25_000.0 {
            Self::FirstOrder
        } else if precision >= 10_000.0 {
            Self::SecondOrder
        } else if precision >= 5_000.0 {
            Self::ThirdOrder
        } else if precision >= 2_500.0 {
            Self::FourthOrder
        } else {
            Self::BelowSpec
        }
    }
}

/// Décision terrain : accepter le levé ou réobserver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldDecision {
    Accept,
    Reject,
}

/// Instantané d'exactitude : charge utile en lecture seule du service
/// d'analyse externe (aucun effet sur le moteur)
#[derive(Debug, Clone, Serialize)]
pub struct AccuracySnapshot {
    /// Longueur totale de la polygonale (mètres)
    pub total_length: f64,
    /// Distance de fermeture (mètres)
    pub misclosure_dist: f64,
    /// Azimut de fermeture (degrés)
    pub misclosure_azimuth: f64,
    /// Précision relative `1:N`
    pub precision: f64,
    /// Composante Est de la fermeture
    pub delta_e: f64,
    /// Composante Nord de la fermeture
    pub delta_n: f64,
    /// Notes de terrain libres
    pub notes: String,
}

/// Ligne du tableau des côtés
#[derive(Debug, Clone, Serialize)]
pub struct LegRow {
    pub station: String,
    pub target: String,
    pub azimuth_dms: String,
    pub distance: f64,
    pub adj_easting: f64,
    pub adj_northing: f64,
    pub side_shot: bool,
}

/// Rapport complet d'une réduction
#[derive(Debug, Clone, Serialize)]
pub struct ReductionReport {
    /// Nom du projet
    pub project: String,
    /// Type de cheminement réduit
    pub traverse_type: TraverseType,
    /// Tableau des côtés (polygonale puis rayonnements)
    pub legs: Vec<LegRow>,
    /// Longueur totale (mètres)
    pub total_length: f64,
    /// Distance de fermeture (mètres)
    pub misclosure_dist: f64,
    /// Azimut de fermeture formaté
    pub misclosure_azimuth_dms: String,
    /// Précision relative `1:N`
    pub precision: f64,
    /// Classe de précision
    pub survey_class: SurveyClass,
    /// Décision terrain
    pub decision: FieldDecision,
    /// Instantané pour le service d'analyse
    pub snapshot: AccuracySnapshot,
    /// Diagnostics du moteur (rayonnements ignorés)
    pub warnings: Vec<String>,
    /// Lignes du carnet exclues avant calcul
    pub skipped_rows: Vec<String>,
}

impl ReductionReport {
    /// Construit le rapport depuis un résultat de réduction
    pub fn from_result(
        project: &str,
        result: &TraverseResult,
        notes: &str,
        skipped: &[SkippedRow],
    ) -> Self {
        let legs = result
            .legs
            .iter()
            .map(|leg| LegRow {
                station: leg.from.id.clone(),
                target: leg.to.id.clone(),
                azimuth_dms: decimal_to_dms(leg.calc_azimuth),
                distance: leg.obs.horizontal_distance,
                adj_easting: leg.adj_easting,
                adj_northing: leg.adj_northing,
                side_shot: leg.is_side_shot,
            })
            .collect();

        let (survey_class, decision) = match result.traverse_type {
            // Rien à fermer sur un cheminement ouvert : on accepte le
            // point final brut
            TraverseType::Open => (SurveyClass::Unclassified, FieldDecision::Accept),
            TraverseType::ClosedLoop => {
                let class = SurveyClass::from_precision(result.precision);
                // Règle de décision standard : réobserver sous 1:5 000
                let decision = if result.precision >= 5_000.0 {
                    FieldDecision::Accept
                } else {
                    FieldDecision::Reject
                };
                (class, decision)
            }
        };

        let warnings = result
            .warnings
            .iter()
            .map(|w| match w {
                ReductionWarning::UnresolvedSideShot { obs_id, station_id } => format!(
                    "side shot '{}' dropped: station '{}' is not in the chain",
                    obs_id, station_id
                ),
            })
            .collect();

        let skipped_rows = skipped
            .iter()
            .map(|row| format!("[{}:{}] {}", row.setup_id, row.obs_id, row.reason))
            .collect();

        Self {
            project: project.to_string(),
            traverse_type: result.traverse_type,
            legs,
            total_length: result.total_length,
            misclosure_dist: result.misclosure_dist,
            misclosure_azimuth_dms: decimal_to_dms(result.misclosure_azimuth),
            precision: result.precision,
            survey_class,
            decision,
            snapshot: AccuracySnapshot {
                total_length: result.total_length,
                misclosure_dist: result.misclosure_dist,
                misclosure_azimuth: result.misclosure_azimuth,
                precision: result.precision,
                delta_e: result.delta_e,
                delta_n: result.delta_n,
                notes: notes.to_string(),
            },
            warnings,
            skipped_rows,
        }
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(72));
        println!("REDUCTION REPORT - {}", self.project);
        println!("{}", "=".repeat(72));

        println!("\n--- LEGS ---");
        println!(
            "{:<8} {:<8} {:>12} {:>10} {:>14} {:>14}",
            "From", "To", "Azimuth", "Dist (m)", "East", "North"
        );
        for leg in &self.legs {
            println!(
                "{:<8} {:<8} {:>12} {:>10.3} {:>14.4} {:>14.4}{}",
                leg.station,
                leg.target,
                leg.azimuth_dms,
                leg.distance,
                leg.adj_easting,
                leg.adj_northing,
                if leg.side_shot { "  (side shot)" } else { "" }
            );
        }

        println!("\n--- CLOSURE ---");
        println!("Total length:       {:.3} m", self.total_length);
        match self.traverse_type {
            TraverseType::Open => println!("Open traverse: raw endpoint accepted, no adjustment"),
            TraverseType::ClosedLoop => {
                println!("Misclosure:         {:.4} m", self.misclosure_dist);
                println!("Misclosure azimuth: {}", self.misclosure_azimuth_dms);
                println!("Relative precision: 1:{:.0}", self.precision);
                println!("Survey class:       {:?}", self.survey_class);
            }
        }
        println!("Field decision:     {:?}", self.decision);

        if !self.warnings.is_empty() {
            println!("\n--- WARNINGS ({}) ---", self.warnings.len());
            for w in &self.warnings {
                println!("  {}", w);
            }
        }

        if !self.skipped_rows.is_empty() {
            println!("\n--- SKIPPED FIELD BOOK ROWS ({}) ---", self.skipped_rows.len());
            for row in &self.skipped_rows {
                println!("  {}", row);
            }
        }

        println!("\n{}", "=".repeat(72));
    }

    /// Résumé compact sur une ligne
    pub fn summary(&self) -> String {
        format!(
            "{}: {} legs, {:.3} m, misclosure {:.4} m (1:{:.0}), {:?}",
            self.project,
            self.legs.len(),
            self.total_length,
            self.misclosure_dist,
            self.precision,
            self.decision
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cheminement::{reduce_traverse, Observation, Point, TraverseType};

    fn leg(id: &str, from: &str, to: &str, azimuth: f64, dist: f64) -> Observation {
        Observation {
            id: id.to_string(),
            from_point_id: from.to_string(),
            to_point_id: to.to_string(),
            horizontal_angle: azimuth,
            horizontal_distance: dist,
            is_traverse_leg: true,
        }
    }

    fn near_square_result(short_by: f64) -> cheminement::TraverseResult {
        let start = Point::control("A", 0.0, 0.0);
        let obs = vec![
            leg("1", "A", "B", 0.0, 100.0),
            leg("2", "B", "C", 90.0, 100.0),
            leg("3", "C", "D", 180.0, 100.0),
            leg("4", "D", "A", 270.0, 100.0 - short_by),
        ];
        reduce_traverse(&start, 0.0, &obs, TraverseType::ClosedLoop, None)
    }

    #[test]
    fn test_survey_class_thresholds() {
        assert_eq!(SurveyClass::from_precision(30_000.0), SurveyClass::FirstOrder);
        assert_eq!(SurveyClass::from_precision(12_000.0), SurveyClass::SecondOrder);
        assert_eq!(SurveyClass::from_precision(7_000.0), SurveyClass::ThirdOrder);
        assert_eq!(SurveyClass::from_precision(3_000.0), SurveyClass::FourthOrder);
        assert_eq!(SurveyClass::from_precision(800.0), SurveyClass::BelowSpec);
    }

    #[test]
    fn test_report_accepts_tight_closure() {
        // 4 mm sur 400 m : 1:100 000
        let result = near_square_result(0.004);
        let report = ReductionReport::from_result("test", &result, "", &[]);

        assert_eq!(report.survey_class, SurveyClass::FirstOrder);
        assert_eq!(report.decision, FieldDecision::Accept);
        assert_eq!(report.legs.len(), 4);
    }

    #[test]
    fn test_report_rejects_poor_closure() {
        // 2 m sur 398 m : 1:199
        let result = near_square_result(2.0);
        let report = ReductionReport::from_result("test", &result, "", &[]);

        assert_eq!(report.survey_class, SurveyClass::BelowSpec);
        assert_eq!(report.decision, FieldDecision::Reject);
    }

    #[test]
    fn test_report_open_traverse_unclassified() {
        let start = Point::control("A", 0.0, 0.0);
        let obs = vec![leg("1", "A", "B", 45.0, 100.0)];
        let result = reduce_traverse(&start, 0.0, &obs, TraverseType::Open, None);
        let report = ReductionReport::from_result("test", &result, "", &[]);

        assert_eq!(report.survey_class, SurveyClass::Unclassified);
        assert_eq!(report.decision, FieldDecision::Accept);
    }

    #[test]
    fn test_summary_one_liner() {
        let result = near_square_result(0.004);
        let report = ReductionReport::from_result("lot-12", &result, "", &[]);

        let line = report.summary();
        assert!(line.starts_with("lot-12: 4 legs"));
        assert!(line.contains("Accept"));
        assert!(!line.contains('\n'));
    }

    #[test]
    fn test_snapshot_carries_notes_and_stats() {
        let result = near_square_result(0.02);
        let report =
            ReductionReport::from_result("test", &result, "Standard traverse, calm weather", &[]);

        assert_eq!(report.snapshot.notes, "Standard traverse, calm weather");
        assert_eq!(report.snapshot.misclosure_dist, result.misclosure_dist);
        assert_eq!(report.snapshot.delta_e, result.delta_e);

        // L'instantané se sérialise pour le consommateur externe
        let json = serde_json::to_value(&report.snapshot).unwrap();
        assert!(json["precision"].is_number());
        assert_eq!(json["notes"], "Standard traverse, calm weather");
    }
}
