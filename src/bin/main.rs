use std::time::Instant;

use clap::{Parser, ValueEnum};
use mixed_radix_p3::{
    domain::MixedRadixEvaluationDomain,
    errors::DomainError,
    fft::{FftStrategy, current_num_workers},
    field::MixedRadixField,
    poly::DensePolynomial,
};
use p3_baby_bear::BabyBear;
use p3_goldilocks::Goldilocks;
use p3_koala_bear::KoalaBear;
use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
    rng,
};
use tracing::{error, info, warn};
use tracing_forest::{ForestLayer, util::LevelFilter};
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FieldArg {
    BabyBear,
    KoalaBear,
    Goldilocks,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    /// Pick from the size of the rayon pool.
    Auto,
    Serial,
    Parallel,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short = 'f', long, value_enum, default_value = "baby-bear")]
    field: FieldArg,

    /// Number of coefficients of the random polynomial.
    #[arg(short = 'n', long = "coeffs", default_value = "393216")]
    num_coeffs: usize,

    /// Coset offset, reduced into the field.
    #[arg(short = 'o', long, default_value = "1")]
    offset: u64,

    #[arg(short = 's', long, value_enum, default_value = "auto")]
    strategy: StrategyArg,

    /// log2 of the number of cosets for the parallel strategy. Defaults to the
    /// largest value the domain and the thread pool allow.
    #[arg(short = 'w', long)]
    log_workers: Option<u32>,
}

fn main() -> Result<(), DomainError> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    Registry::default()
        .with(env_filter)
        .with(ForestLayer::default())
        .init();

    let args = Args::parse();

    match args.field {
        FieldArg::BabyBear => run::<BabyBear>(&args),
        FieldArg::KoalaBear => run::<KoalaBear>(&args),
        FieldArg::Goldilocks => run::<Goldilocks>(&args),
    }
}

fn run<F: MixedRadixField>(args: &Args) -> Result<(), DomainError>
where
    StandardUniform: Distribution<F>,
{
    let domain = MixedRadixEvaluationDomain::<F>::try_new(args.num_coeffs)?;
    let Some(domain) = domain.get_coset(F::from_u64(args.offset)) else {
        error!(offset = args.offset, "coset offset is zero in the field");
        std::process::exit(1);
    };
    let factors = domain.factors();

    let strategy = match args.strategy {
        StrategyArg::Auto => FftStrategy::select(factors),
        StrategyArg::Serial => FftStrategy::Serial,
        StrategyArg::Parallel => {
            let max_log_workers = match FftStrategy::for_workers(factors, current_num_workers()) {
                FftStrategy::Parallel { log_num_workers } => log_num_workers,
                FftStrategy::Serial => 0,
            };
            let log_num_workers = args.log_workers.unwrap_or(max_log_workers);
            if log_num_workers > factors.two_adicity {
                warn!(
                    log_num_workers,
                    two_adicity = factors.two_adicity,
                    "too many cosets for this domain, clamping"
                );
            }
            FftStrategy::Parallel {
                log_num_workers: log_num_workers.min(factors.two_adicity),
            }
        }
    };

    info!(
        field = ?args.field,
        num_coeffs = args.num_coeffs,
        size = domain.size(),
        q = domain.q,
        two_adicity = factors.two_adicity,
        q_adicity = factors.q_adicity,
        ?strategy,
        "built mixed-radix domain"
    );

    let mut rng = rng();
    let poly = DensePolynomial::from_coefficients_vec(
        (0..args.num_coeffs).map(|_| rng.random()).collect(),
    );

    let mut buf = poly.coeffs().to_vec();
    let time = Instant::now();
    domain.fft_in_place_with(&mut buf, strategy);
    info!(elapsed = ?time.elapsed(), "forward transform");

    let time = Instant::now();
    domain.ifft_in_place_with(&mut buf, strategy);
    info!(elapsed = ?time.elapsed(), "inverse transform");

    if DensePolynomial::from_coefficients_vec(buf) == poly {
        info!("round trip recovered the polynomial");
    } else {
        error!("round trip mismatch");
        std::process::exit(1);
    }

    Ok(())
}
