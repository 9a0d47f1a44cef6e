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
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use ampseed::distance::Distance;

#[derive(Parser)]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    // Train a database from one <Family>.fasta file per family
    Build {
        // Directory containing the training data
        #[arg(group = "input", required = true, help = "Directory with <Family>.fasta files")]
        families_dir: PathBuf,

        // Output file path
        #[arg(short = 'o', long = "output", required = true)]
        out_file: PathBuf,

        // Reduced alphabet
        #[arg(long = "alphabet", default_value = "murphy-10")]
        alphabet: String,

        // Scoring, majority or out-of-place
        #[arg(long = "distance", default_value = "majority")]
        distance: Distance,

        // Ranks compared by out-of-place
        #[arg(long = "top", default_value_t = ampseed::distance::DEFAULT_TOP)]
        top: usize,

        // Spaced seeds, defaults to the built-in set
        #[arg(long = "seed", required = false)]
        seeds: Vec<String>,

        // Additional alphabet table
        #[arg(long = "alphabets", required = false)]
        alphabets: Option<PathBuf>,

        // Verbosity
        #[arg(long = "verbose", default_value_t = false)]
        verbose: bool,
    },

    // Classify sequences against a database
    Classify {
        // Input fasta or fastq sequence file(s)
        #[arg(group = "input", required = true, help = "Input file(s)")]
        input_files: Vec<PathBuf>,

        // Database built with `ampseed build`
        #[arg(long = "db", required = true)]
        db_file: PathBuf,

        // Print every matching family instead of the best one
        #[arg(long = "all", default_value_t = false)]
        all: bool,

        // Verbosity
        #[arg(long = "verbose", default_value_t = false)]
        verbose: bool,
    },

    // Cross-validate an alphabet
    Validate {
        // Directory containing the training data
        #[arg(group = "input", required = true, help = "Directory with <Family>.fasta files")]
        families_dir: PathBuf,

        // Reduced alphabet
        #[arg(long = "alphabet", default_value = "murphy-10")]
        alphabet: String,

        // Every n-th sequence is held out
        #[arg(long = "folds", default_value_t = 8)]
        folds: usize,

        // Number of rounds with different holdouts
        #[arg(long = "rounds", default_value_t = 1)]
        rounds: usize,

        // Report file, defaults to stdout
        #[arg(short = 'o', long = "output", required = false)]
        out_file: Option<PathBuf>,

        // Additional alphabet table
        #[arg(long = "alphabets", required = false)]
        alphabets: Option<PathBuf>,

        // Worker threads, 0 for one per core
        #[arg(short = 't', long = "threads", default_value_t = 1)]
        threads: usize,

        // Verbosity
        #[arg(long = "verbose", default_value_t = false)]
        verbose: bool,
    },

    // Search for an alphabet by simulated annealing
    Anneal {
        // Directory containing the training data
        #[arg(group = "input", required = true, help = "Directory with <Family>.fasta files")]
        families_dir: PathBuf,

        // Number of classes in the alphabet
        #[arg(long = "size", required = true)]
        size: usize,

        // Seed for the random number generator
        #[arg(long = "rng-seed", required = false)]
        rng_seed: Option<u64>,

        // Starting temperature
        #[arg(long = "max-temperature", default_value_t = 30)]
        max_temperature: u32,

        // Candidates per temperature
        #[arg(long = "transitions", default_value_t = 100)]
        transitions: u32,

        // Stop at this MCC
        #[arg(long = "target", default_value_t = 0.99)]
        target: f64,

        // Worker threads, 0 for one per core
        #[arg(short = 't', long = "threads", default_value_t = 1)]
        threads: usize,

        // Verbosity
        #[arg(long = "verbose", default_value_t = false)]
        verbose: bool,
    },

    // List the known alphabets
    Alphabets {
        // Additional alphabet table
        #[arg(long = "alphabets", required = false)]
        alphabets: Option<PathBuf>,

        // Verbosity
        #[arg(long = "verbose", default_value_t = false)]
        verbose: bool,
    },
}
