use chrono::{DateTime, Duration, Utc};

use crate::entities::{TemperatureUnit, VitalSignReading, VitalSignTrends, VitalStatistics};
use crate::services::analyzer::{
    blood_pressure_category, bmi_category, calculate_bmi, check_abnormal_values, round_to_tenth,
};

/// Summarize the readings recorded in the `timeframe_days` before `as_of`.
///
/// Returns `None` when no reading falls inside the window.
pub fn summarize_trends(
    readings: &[VitalSignReading],
    timeframe_days: u32,
    as_of: DateTime<Utc>,
) -> Option<VitalSignTrends> {
    // A window reaching past the earliest representable date covers all history
    let window_start = Duration::try_days(i64::from(timeframe_days))
        .and_then(|span| as_of.checked_sub_signed(span))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let mut window: Vec<&VitalSignReading> = readings
        .iter()
        .filter(|r| r.recorded_at >= window_start && r.recorded_at <= as_of)
        .collect();
    if window.is_empty() {
        return None;
    }
    window.sort_by_key(|r| r.recorded_at);

    let systolic = statistics(
        window
            .iter()
            .filter_map(|r| r.measurement.blood_pressure_systolic.map(f64::from)),
    );
    let diastolic = statistics(
        window
            .iter()
            .filter_map(|r| r.measurement.blood_pressure_diastolic.map(f64::from)),
    );
    let heart_rate = statistics(window.iter().filter_map(|r| r.measurement.heart_rate.map(f64::from)));
    let temperature = statistics(window.iter().filter_map(|r| r.measurement.temperature));
    let weight = statistics(window.iter().filter_map(|r| r.measurement.weight));
    let respiratory_rate = statistics(
        window
            .iter()
            .filter_map(|r| r.measurement.respiratory_rate.map(f64::from)),
    );
    let oxygen_saturation = statistics(window.iter().filter_map(|r| r.measurement.oxygen_saturation));

    // Averages of u16 readings stay within u16 range
    let blood_pressure_category = match (&systolic, &diastolic) {
        (Some(s), Some(d)) => blood_pressure_category(
            Some(s.average.round() as u16),
            Some(d.average.round() as u16),
        ),
        _ => None,
    };

    let latest_bmi = window.iter().rev().find_map(|r| {
        r.bmi
            .or_else(|| calculate_bmi(r.measurement.weight, r.measurement.height))
    });

    let abnormal_reading_count = window
        .iter()
        .filter(|r| !check_abnormal_values(&r.measurement, TemperatureUnit::Fahrenheit).is_empty())
        .count();

    Some(VitalSignTrends {
        reading_count: window.len(),
        period_days: timeframe_days,
        generated_at: as_of,
        systolic,
        diastolic,
        heart_rate,
        temperature,
        weight,
        respiratory_rate,
        oxygen_saturation,
        blood_pressure_category,
        latest_bmi,
        latest_bmi_category: bmi_category(latest_bmi),
        abnormal_reading_count,
    })
}

/// Statistics over values given in chronological order
fn statistics(values: impl Iterator<Item = f64>) -> Option<VitalStatistics> {
    let mut sum = 0.0;
    let mut count = 0usize;
    let mut min = f64::MAX;
    let mut max = f64::MIN;
    let mut latest = None;

    for value in values {
        sum += value;
        count += 1;
        min = min.min(value);
        max = max.max(value);
        latest = Some(value);
    }

    let latest = latest?;
    Some(VitalStatistics {
        average: round_to_tenth(sum / count as f64),
        min,
        max,
        latest,
        count,
    })
}
