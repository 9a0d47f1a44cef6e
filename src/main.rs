// ampseed: Antimicrobial peptide classification with spaced-seed k-mer profiles.
//
// Copyright 2025 Tommi Mäklin [tommi@maklin.fi].
//
// Copyrights in this project are retained by contributors. No copyright assignment
// is required to contribute to this project.
//
// Except as otherwise noted (below and/or in individual files), this
// project is licensed under the Apache License, Version 2.0
// <LICENSE-APACHE> or <http://www.apache.org/licenses/LICENSE-2.0> or
// the MIT license, <LICENSE-MIT> or <http://opensource.org/licenses/MIT>,
// at your option.
//
use std::fs::File;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use ampseed::alphabet::AlphabetTable;
use ampseed::anneal::Annealer;
use ampseed::anneal::CandidateAlphabet;
use ampseed::distance::Distance;
use ampseed::kmer::seed::DEFAULT_SEEDS;
use ampseed::sequence::SequenceType;
use ampseed::validate::CrossValidation;
use ampseed::DatabaseConfig;

use clap::CommandFactory;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

mod cli;

/// Initializes the logger with verbosity given in `log_max_level`.
fn init_log(log_max_level: usize) {
    stderrlog::new()
    .module(module_path!())
    .quiet(false)
    .verbosity(log_max_level)
    .timestamp(stderrlog::Timestamp::Off)
    .init()
    .unwrap();
}

/// Built-in alphabets, extended or overridden by the table in `path`.
fn read_alphabets(
    path: &Option<PathBuf>,
) -> ampseed::Result<AlphabetTable> {
    let mut table = AlphabetTable::builtin()?;
    if let Some(path) = path {
        let extra = AlphabetTable::parse(BufReader::new(File::open(path)?))?;
        log::info!("Read {} alphabets from {}", extra.len(), path.display());
        extra.iter().for_each(|alphabet| table.insert(alphabet.clone()));
    }
    Ok(table)
}

fn open_output(
    path: &Option<PathBuf>,
) -> ampseed::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(std::io::stdout())),
    })
}

fn read_training_data(
    dir: &Path,
) -> ampseed::Result<indexmap::IndexMap<ampseed::Family, Vec<ampseed::sequence::SequenceRecord>>> {
    let families = ampseed::sequence::read_family_dir(dir, SequenceType::Protein)?;
    if families.is_empty() {
        log::warn!("No <Family>.fasta files in {}", dir.display());
    }
    Ok(families)
}

fn run(
    command: &Option<cli::Commands>,
) -> ampseed::Result<()> {
    match command {
        // Build
        Some(cli::Commands::Build {
            families_dir,
            out_file,
            alphabet,
            distance,
            top,
            seeds,
            alphabets,
            verbose,
        }) => {
            init_log(if *verbose { 2 } else { 1 });

            let table = read_alphabets(alphabets)?;
            let seed_patterns: Vec<String> = if seeds.is_empty() {
                DEFAULT_SEEDS.iter().map(|x| x.to_string()).collect()
            } else {
                seeds.clone()
            };
            let config = DatabaseConfig {
                alphabet: alphabet.clone(),
                seed_patterns,
                distance: distance.with_top(*top),
                ..Default::default()
            };

            let families = read_training_data(families_dir)?;
            let database = ampseed::train_database(&config, &table, &families)?;
            ampseed::save_database_to_path(&database, out_file)?;
            log::info!("Wrote {} profiles to {}", database.profiles().len(), out_file.display());
        },

        // Classify
        Some(cli::Commands::Classify {
            input_files,
            db_file,
            all,
            verbose,
        }) => {
            init_log(if *verbose { 2 } else { 1 });

            let database = ampseed::load_database_from_path(db_file)?;
            log::info!("Loaded {} profiles using {}, {}", database.profiles().len(), database.alphabet().id(), database.distance());

            let mut conn_out = BufWriter::new(std::io::stdout());
            for file in input_files {
                let records = ampseed::sequence::read_sequences_from_path(file, SequenceType::Protein)?;
                for record in records {
                    let results = database.classify_sequence(&record)?;
                    if *all {
                        for result in results {
                            writeln!(conn_out, "{}\t{}\t{}", record.name, result.family, result.score)?;
                        }
                    } else {
                        let family = ampseed::database::best_family(&results);
                        let score = results.first().map(|x| x.score).unwrap_or(0.0);
                        writeln!(conn_out, "{}\t{}\t{}", record.name, family, score)?;
                    }
                }
            }
            conn_out.flush()?;
        },

        // Validate
        Some(cli::Commands::Validate {
            families_dir,
            alphabet,
            folds,
            rounds,
            out_file,
            alphabets,
            threads,
            verbose,
        }) => {
            init_log(if *verbose { 2 } else { 1 });

            let table = read_alphabets(alphabets)?;
            let config = DatabaseConfig { alphabet: alphabet.clone(), ..Default::default() };
            let template = ampseed::ProfileDatabase::new(&config, &table)?;

            let families = read_training_data(families_dir)?;
            let validation = CrossValidation { folds: *folds, rounds: *rounds, threads: *threads };
            let report = validation.run(&template, &families)?;
            log::info!("MCC of {}: {:.4}", alphabet, report.matrix.mcc());

            let mut conn_out = open_output(out_file)?;
            ampseed::validate::write_report(&report, &mut conn_out)?;
            conn_out.flush()?;
        },

        // Anneal
        Some(cli::Commands::Anneal {
            families_dir,
            size,
            rng_seed,
            max_temperature,
            transitions,
            target,
            threads,
            verbose,
        }) => {
            init_log(if *verbose { 2 } else { 1 });

            let mut rng = match rng_seed {
                Some(seed) => StdRng::seed_from_u64(*seed),
                None => StdRng::from_entropy(),
            };

            let families = read_training_data(families_dir)?;
            let config = DatabaseConfig { distance: Distance::MajorityCount, ..Default::default() };
            let validation = CrossValidation { threads: *threads, ..Default::default() };
            let annealer = Annealer { max_temperature: *max_temperature, transitions: *transitions, target: *target };

            let id = format!("anneal-{}", size);
            let initial = CandidateAlphabet::random(*size, &mut rng)?;
            let outcome = annealer.run(&id, initial, |alphabet| {
                ampseed::anneal::cross_validated_mcc(alphabet, &families, &config, &validation)
            }, &mut rng)?;
            log::info!("Best MCC {:.4} after {} evaluations", outcome.score, outcome.evaluations);

            println!("{}", outcome.best.to_alphabet(&id)?.to_table_line());
        },

        // Alphabets
        Some(cli::Commands::Alphabets {
            alphabets,
            verbose,
        }) => {
            init_log(if *verbose { 2 } else { 1 });

            let table = read_alphabets(alphabets)?;
            let mut conn_out = BufWriter::new(std::io::stdout());
            for alphabet in table.iter() {
                writeln!(conn_out, "{}", alphabet.to_table_line())?;
            }
            conn_out.flush()?;
        },

        None => {
            cli::Cli::command().print_help()?;
        },
    }
    Ok(())
}

fn main() {
    let cli = cli::Cli::parse();

    if let Err(e) = run(&cli.command) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
