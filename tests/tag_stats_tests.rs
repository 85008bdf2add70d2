//! Tag statistics over an imported diary

use letterboxd_tag_stats_lib::domain::tag_stats::{
    compute_tag_stats, films_with_tag, rating_distribution, summarize,
};
use letterboxd_tag_stats_lib::domain::DiaryEntry;
use letterboxd_tag_stats_lib::infrastructure::import_diary_csv;
use rstest::{fixture, rstest};

#[fixture]
fn diary() -> Vec<DiaryEntry> {
    let csv = "\
Name,Year,Rating,Watched Date,Rewatch,Tags
Heat,1995,5,2024-01-01,,\"cinema, friends\"
Alien,1979,4,2024-01-02,,cinema
Heat,1995,4,2024-01-03,Yes,home
Cats,2019,1,2024-01-04,,\"cinema, friends\"
Stalker,1979,,2024-01-05,,home
Ran,1985,3,2024-01-06,,
";
    import_diary_csv(csv.as_bytes()).unwrap()
}

#[rstest]
fn summary_counts(diary: Vec<DiaryEntry>) {
    let summary = summarize(&diary);

    assert_eq!(summary.entry_count, 6);
    assert_eq!(summary.rated_titles, 4, "Heat counts once");
    assert_eq!(summary.unique_tags, 3);
    // One rating per (entry, tag) row: (5 + 5 + 4 + 4 + 1 + 1 + 3) / 7
    assert!((summary.average_rating.unwrap() - 23.0 / 7.0).abs() < 1e-9);
}

#[rstest]
fn tags_sorted_by_usage(diary: Vec<DiaryEntry>) {
    let stats = compute_tag_stats(&diary, 1);
    let tags: Vec<&str> = stats.iter().map(|s| s.tag.as_str()).collect();

    // cinema: 3 rated, friends: 2, home: 1 (Stalker is unrated)
    assert_eq!(tags, ["cinema", "friends", "home"]);

    let cinema = &stats[0];
    assert_eq!(cinema.films, 3);
    assert!((cinema.average - 3.33).abs() < 1e-9);
    assert!((cinema.median - 4.0).abs() < 1e-9);
    assert!((cinema.vs_average - 0.05).abs() < 1e-9);

    let friends = &stats[1];
    assert!((friends.average - 3.0).abs() < 1e-9);
    assert!((friends.median - 3.0).abs() < 1e-9);
    assert!((friends.vs_average - (-0.29)).abs() < 1e-9);
}

#[rstest]
#[case(1, 3)]
#[case(2, 2)]
#[case(3, 1)]
#[case(4, 0)]
fn min_films_filter(diary: Vec<DiaryEntry>, #[case] min_films: usize, #[case] expected: usize) {
    assert_eq!(compute_tag_stats(&diary, min_films).len(), expected);
}

#[rstest]
fn distribution_by_half_star(diary: Vec<DiaryEntry>) {
    let all = rating_distribution(&diary, None);
    // Heat and Cats carry two tags each, so they count twice
    assert_eq!(all.iter().sum::<usize>(), 7);
    assert_eq!(all[9], 2, "Heat 5.0 under cinema and friends");
    assert_eq!(all[7], 2, "Alien and the Heat rewatch at 4.0");
    assert_eq!(all[5], 1, "Ran 3.0");
    assert_eq!(all[1], 2, "Cats 1.0 under cinema and friends");

    let cinema = rating_distribution(&diary, Some("cinema"));
    assert_eq!(cinema.iter().sum::<usize>(), 3);
}

#[rstest]
fn films_with_tag_dedups_and_ranks(diary: Vec<DiaryEntry>) {
    let titles: Vec<&str> =
        films_with_tag(&diary, "cinema").iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, ["Heat", "Alien", "Cats"]);

    let home: Vec<&str> = films_with_tag(&diary, "home").iter().map(|e| e.title.as_str()).collect();
    assert_eq!(home, ["Heat", "Stalker"], "unrated last");
}
