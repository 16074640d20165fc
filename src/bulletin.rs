use std::fmt::Write;

use chrono::NaiveDateTime;

use crate::config::StaticHeader;
use crate::models::{AreaBulletin, BatchHeader, LayerReport, ReportBatch};

/// `DDHHMMZMONYYYY`, upper case, e.g. `141933ZAPR2025`.
pub fn format_dtg(dt: &NaiveDateTime) -> String {
    dt.format("%d%H%MZ%b%Y").to_string().to_uppercase()
}

/// Exercise/classification lines always end in `//`.
pub fn normalize_exercise_tag(tag: &str) -> String {
    let tag = tag.trim();
    if tag.ends_with("//") {
        tag.to_string()
    } else {
        format!("{tag}//")
    }
}

pub fn dtg_line(created_at: &NaiveDateTime) -> String {
    format!("DTG/{}//", format_dtg(created_at))
}

pub fn zulum_line(header: &BatchHeader) -> String {
    format!(
        "ZULUM/{}/{}/{}//",
        format_dtg(&header.model_start),
        format_dtg(&header.forecast_start),
        format_dtg(&header.forecast_end)
    )
}

/// `LAYERM/HH/DDD/FFF/...//` in ascending layer order. Config caps layer tops
/// at two digits and directions stay below 360; a speed of 1000 km/h or more
/// widens its field rather than being clipped.
pub fn layer_line(layers: &[LayerReport]) -> String {
    let mut ordered = layers.to_vec();
    ordered.sort_by_key(|layer| layer.layer_top_km);

    let fields: Vec<String> = ordered
        .iter()
        .map(|layer| {
            format!(
                "{:02}/{:03}/{:03}",
                layer.layer_top_km, layer.direction_deg, layer.speed_kph
            )
        })
        .collect();
    format!("LAYERM/{}//", fields.join("/"))
}

/// The seven lines every bulletin starts with, newline-terminated.
pub fn render_header(header: &BatchHeader, fixed: &StaticHeader, area_name: &str) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "{}", normalize_exercise_tag(&header.exercise_tag));
    let _ = writeln!(output, "{}", fixed.msgid);
    let _ = writeln!(output, "{}", fixed.geodatum);
    let _ = writeln!(output, "{}", dtg_line(&header.created_at));
    let _ = writeln!(output, "AREAM/{}//", area_name);
    let _ = writeln!(output, "{}", zulum_line(header));
    let _ = writeln!(output, "{}", fixed.units);

    output
}

pub fn render_bulletin(bulletin: &AreaBulletin, header: &BatchHeader, fixed: &StaticHeader) -> String {
    let mut output = render_header(header, fixed, &bulletin.area_name);
    output.push_str(&layer_line(&bulletin.layers));
    output
}

/// Whole artifact: bulletins in match order, separated by a single newline.
pub fn render_batch(batch: &ReportBatch, fixed: &StaticHeader) -> String {
    batch
        .bulletins
        .iter()
        .map(|bulletin| render_bulletin(bulletin, &batch.header, fixed))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(yyyy: i32, mm: u32, dd: u32, hh: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(yyyy, mm, dd)
            .unwrap()
            .and_hms_opt(hh, min, 0)
            .unwrap()
    }

    fn header() -> BatchHeader {
        BatchHeader {
            exercise_tag: "EXER/TESTCOAS/-".to_string(),
            created_at: dt(2025, 4, 14, 19, 33),
            model_start: dt(2025, 4, 14, 12, 0),
            forecast_start: dt(2025, 4, 16, 0, 0),
            forecast_end: dt(2025, 4, 16, 6, 0),
        }
    }

    fn bulletin(area_name: &str) -> AreaBulletin {
        AreaBulletin {
            area_name: area_name.to_string(),
            layers: (2..=30)
                .step_by(2)
                .map(|layer_top_km| LayerReport {
                    layer_top_km,
                    direction_deg: 5,
                    speed_kph: layer_top_km * 4,
                })
                .collect(),
        }
    }

    #[test]
    fn dtg_is_uppercase_day_hour_minute_month_year() {
        assert_eq!(format_dtg(&dt(2025, 4, 14, 19, 33)), "141933ZAPR2025");
        assert_eq!(format_dtg(&dt(2024, 12, 1, 0, 5)), "010005ZDEC2024");
    }

    #[test]
    fn header_lines_match_reference_run() {
        let text = render_header(&header(), &StaticHeader::default(), "NFEB31");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "EXER/TESTCOAS/-//",
                "MSGID/CBRN BWR/IMGW-PIB/-/-/-/-/-/-/-/-//",
                "GEODATUM/WGE//",
                "DTG/141933ZAPR2025//",
                "AREAM/NFEB31//",
                "ZULUM/141200ZAPR2025/160000ZAPR2025/160600ZAPR2025//",
                "UNITM/-/DGG/KPH/-//",
            ]
        );
    }

    #[test]
    fn exercise_tag_keeps_existing_terminator() {
        assert_eq!(normalize_exercise_tag("OPER/ALPHA/-//"), "OPER/ALPHA/-//");
        assert_eq!(normalize_exercise_tag("OPER/ALPHA/-"), "OPER/ALPHA/-//");
    }

    #[test]
    fn layer_line_is_zero_padded_and_ascending() {
        let layers = vec![
            LayerReport { layer_top_km: 4, direction_deg: 270, speed_kph: 112 },
            LayerReport { layer_top_km: 2, direction_deg: 5, speed_kph: 9 },
        ];
        assert_eq!(layer_line(&layers), "LAYERM/02/005/009/04/270/112//");
    }

    #[test]
    fn extreme_speed_widens_its_field() {
        let layers = vec![LayerReport { layer_top_km: 99, direction_deg: 0, speed_kph: 1204 }];
        assert_eq!(layer_line(&layers), "LAYERM/99/000/1204//");
    }

    #[test]
    fn full_bulletin_ends_with_layer_line() {
        let text = render_bulletin(&bulletin("NFEB31"), &header(), &StaticHeader::default());
        let last = text.lines().last().unwrap();
        assert!(last.starts_with("LAYERM/02/005/008/04/005/016/"));
        assert!(last.ends_with("/30/005/120//"));
        assert_eq!(text.lines().count(), 8);
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn batch_joins_bulletins_with_newline() {
        let batch = ReportBatch {
            header: header(),
            bulletins: vec![bulletin("A1"), bulletin("B2")],
        };
        let text = render_batch(&batch, &StaticHeader::default());
        assert_eq!(text.lines().count(), 16);
        assert!(text.contains("//\nEXER/TESTCOAS/-//\n"));
        assert!(text.find("AREAM/A1//").unwrap() < text.find("AREAM/B2//").unwrap());
    }

    #[test]
    fn empty_batch_renders_nothing() {
        let batch = ReportBatch {
            header: header(),
            bulletins: Vec::new(),
        };
        assert_eq!(render_batch(&batch, &StaticHeader::default()), "");
    }
}
