use crate::arguments::MovieOptions;
use crate::commands::{excerpt, record, settled, table};
use comfy_table::Cell;
use reel_report::errors::RetrievalError;
use reel_report::helpers::progress::{step, CLAPPER, TELEVISION};
use reel_report::movies::{self, MediaInfo, MediaType, MovieDetails, MovieList};
use reel_report::state::{ViewScope, ViewState};
use reel_report::store::{Operation, Store};
use reel_report::youtube::{self, VideoSnippet};
use reel_report::ApiContext;

fn info_rows(details: &MovieDetails) -> Vec<(&'static str, Option<String>)> {
    match &details.info {
        MediaInfo::Movie {
            runtime_minutes,
            budget,
            revenue,
            production_companies,
        } => vec![
            ("Runtime", runtime_minutes.map(|v| format!("{v} min"))),
            ("Budget", budget.map(|v| format!("${v}"))),
            ("Revenue", revenue.map(|v| format!("${v}"))),
            ("Production", Some(production_companies.join(", "))),
        ],
        MediaInfo::Tv {
            episode_runtime_minutes,
            seasons,
            episodes,
            last_air_date,
            networks,
            created_by,
        } => vec![
            ("Episode runtime", episode_runtime_minutes.map(|v| format!("{v} min"))),
            ("Seasons", seasons.map(|v| v.to_string())),
            ("Episodes", episodes.map(|v| v.to_string())),
            ("Last aired", last_air_date.map(|d| d.to_string())),
            ("Networks", Some(networks.join(", "))),
            ("Created by", Some(created_by.join(", "))),
        ],
    }
}

fn print_details(api: &ApiContext, details: &MovieDetails) {
    let image_base = &api.config().tmdb.image_url;
    let mut rows = vec![
        ("Title", Some(details.title.clone())),
        ("Tagline", details.tagline.clone()),
        ("Genres", Some(details.genre_line())),
        ("Released", details.release_date.map(|d| d.to_string())),
        ("Status", details.status.clone()),
        (
            "Rating",
            details.vote_average.map(|avg| match details.vote_count {
                Some(count) => format!("{avg:.1} ({count} votes)"),
                None => format!("{avg:.1}"),
            }),
        ),
        ("Directed by", Some(details.directors().join(", "))),
        ("Overview", Some(details.overview.clone())),
        ("Homepage", details.homepage.clone()),
        ("Poster", details.poster_url(image_base)),
    ];
    rows.extend(info_rows(details));
    println!("{}", record(rows));

    if !details.cast.is_empty() {
        let mut table = table(&["Cast", "Character"]);
        for member in details.cast.iter().take(10) {
            table.add_row(vec![
                Cell::new(&member.name),
                Cell::new(member.character.as_deref().unwrap_or_default()),
            ]);
        }
        println!("{table}");
    }
}

fn print_trailers(trailers: &[VideoSnippet]) {
    let mut table = table(&["Trailer", "Channel", "Watch"]);
    for trailer in trailers {
        table.add_row(vec![
            Cell::new(&trailer.title),
            Cell::new(trailer.channel_title.as_deref().unwrap_or_default()),
            Cell::new(&trailer.watch_url),
        ]);
    }
    println!("{table}");
}

fn print_similar(list: &MovieList) {
    let mut table = table(&["Id", "Title", "Released", "Rating", "Overview"]);
    for movie in &list.items {
        table.add_row(vec![
            Cell::new(movie.id),
            Cell::new(&movie.title),
            Cell::new(movie.release_date.map(|d| d.to_string()).unwrap_or_default()),
            Cell::new(movie.vote_average.map(|v| format!("{v:.1}")).unwrap_or_default()),
            Cell::new(excerpt(&movie.overview, 80)),
        ]);
    }
    println!("{table}");
    println!("Page {} of {}", list.page, list.total_pages);
}

/// Trailer lookups live as long as the detail view
async fn lookup_trailers(
    api: &ApiContext,
    shutdown: &ViewScope,
    details: &MovieDetails,
    store: &Store,
) {
    let scope = ViewScope::new();
    let retrieval = youtube::retrieve_video_details(api, &details.videos, &scope, store);

    match shutdown.try_run(Operation::VideoDetails, retrieval).await {
        Ok(collection) => {
            for failure in &collection.failures {
                tracing::warn!(key = %failure.key, "Trailer unavailable: {}", failure.reason);
            }
        }
        Err(RetrievalError::Cancelled(_)) => eprintln!("Trailer lookup cancelled"),
        Err(e) => tracing::warn!("Trailer lookup failed: {e}"),
    }

    scope.teardown();
}

pub(crate) async fn details(
    api: &ApiContext,
    shutdown: &ViewScope,
    options: &MovieOptions,
) -> anyhow::Result<()> {
    let store = Store::new();
    let media_type = if options.tv {
        MediaType::Tv
    } else {
        MediaType::Movie
    };
    let total = 1 + usize::from(!options.no_trailers) + usize::from(options.similar.is_some());
    let mut current = 1;

    let emoji = match media_type {
        MediaType::Movie => CLAPPER,
        MediaType::Tv => TELEVISION,
    };
    step(current, total, emoji, &format!("Retrieving {media_type} details..."));
    let mut view = ViewState::new();
    let ticket = view.mount();
    let retrieval = movies::retrieve_movie_details(api, media_type, options.id, &store);
    view.complete(ticket, shutdown.try_run(Operation::MovieDetails, retrieval).await);
    let details = settled(&view)?;
    print_details(api, details);

    if !options.no_trailers {
        current += 1;
        step(
            current,
            total,
            emoji,
            &format!("Looking up {} trailers...", details.videos.len()),
        );
        lookup_trailers(api, shutdown, details, &store).await;

        let trailers = store.snapshot().trailers;
        if !trailers.is_empty() {
            print_trailers(&trailers);
        }
    }

    if let Some(page) = options.similar {
        current += 1;
        step(current, total, emoji, "Retrieving similar movies...");
        // Failure is already reported, the details stay useful without it
        let retrieval = movies::retrieve_similar_movies(api, options.id, page, &store);
        match shutdown.try_run(Operation::SimilarMovies, retrieval).await {
            Ok(list) => print_similar(&list),
            Err(RetrievalError::Cancelled(_)) => return Ok(()),
            Err(_) => {}
        }
    }

    if options.share {
        match details.share_content() {
            Some(share) => println!("{}", serde_json::to_string_pretty(&share)?),
            None => eprintln!("Nothing to share, {} has no homepage", details.title),
        }
    }

    let failures = store.snapshot().failures;
    if let Some(reason) = failures.get(&Operation::SimilarMovies) {
        eprintln!("Similar movies unavailable: {reason}");
    }

    Ok(())
}
