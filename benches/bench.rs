// Criterion benchmarks for Ski Stay

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ski_stay::core::{
    candidates::{select_candidates, DEFAULT_CANDIDATE_RADIUS_KM},
    distance::great_circle_distance,
    filters::filter_listings,
    DesirabilityTable, ResortScorer,
};
use ski_stay::models::{
    CandidateResort, Coordinates, DrivingResult, DrivingStatus, Listing, Resort, RoutedListing,
    RoutedResort, TextValue,
};

fn create_listing(id: usize, lat: f64, lon: f64) -> Listing {
    Listing {
        uid: Some(id.to_string()),
        latitude: lat,
        longitude: lon,
        host_internet_access: Some("1".to_string()),
        host_max_wwoofers: Some(if id % 5 == 0 { "1" } else { "2" }.to_string()),
        ..Default::default()
    }
}

fn create_resorts(count: usize) -> Vec<Resort> {
    (0..count)
        .map(|i| Resort {
            name: format!("Resort {}", i),
            latitude: 45.0 + (i as f64 * 0.37) % 8.0,
            longitude: -125.0 + (i as f64 * 0.53) % 10.0,
            season_pass: if i % 4 == 0 { None } else { Some(900.0 + i as f64 * 50.0) },
        })
        .collect()
}

fn bench_great_circle_distance(c: &mut Criterion) {
    c.bench_function("great_circle_distance", |b| {
        b.iter(|| {
            great_circle_distance(
                black_box(Coordinates::new(49.2827, -123.1207)),
                black_box(Coordinates::new(50.1163, -122.9574)),
            )
        });
    });
}

fn bench_candidate_selection(c: &mut Criterion) {
    let resorts = create_resorts(40);
    let mut group = c.benchmark_group("candidate_selection");

    for listing_count in [100, 1000, 5000].iter() {
        let listings: Vec<Listing> = (0..*listing_count)
            .map(|i| create_listing(i, 45.0 + (i as f64 * 0.01) % 8.0, -125.0 + (i as f64 * 0.013) % 10.0))
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(listing_count), &listings, |b, listings| {
            b.iter(|| {
                let filtered = filter_listings(black_box(listings.clone()));
                select_candidates(filtered, &resorts, DEFAULT_CANDIDATE_RADIUS_KM)
            });
        });
    }

    group.finish();
}

fn bench_scoring(c: &mut Criterion) {
    let resorts = create_resorts(40);
    let table = DesirabilityTable::from_positions(
        &resorts,
        &resorts.iter().enumerate().map(|(i, _)| (i % 3) as f64 / 2.0).collect::<Vec<_>>(),
    )
    .unwrap();
    let scorer = ResortScorer::with_defaults(table);

    let routed = RoutedListing {
        listing: create_listing(1, 49.0, -121.0),
        resorts: resorts
            .iter()
            .enumerate()
            .map(|(i, resort)| RoutedResort {
                candidate: CandidateResort {
                    resort: resort.clone(),
                    distance_m: 50_000.0,
                },
                driving: DrivingResult {
                    status: if i % 7 == 0 { DrivingStatus::ZeroResults } else { DrivingStatus::Ok },
                    duration: Some(TextValue {
                        text: "1 hour".to_string(),
                        value: 600.0 + i as f64 * 180.0,
                    }),
                    distance: Some(TextValue {
                        text: "80 km".to_string(),
                        value: 80_000.0,
                    }),
                },
            })
            .collect(),
    };

    c.bench_function("score_listing_40_resorts", |b| {
        b.iter(|| scorer.score_listing(black_box(routed.clone())));
    });
}

criterion_group!(
    benches,
    bench_great_circle_distance,
    bench_candidate_selection,
    bench_scoring
);
criterion_main!(benches);
