use fz_params::*;

fn main() -> FzResult<()> {
    init_tracing()?;

    // Defaults shipped with a matrix factorization model
    let defaults = Params::new()
        .with(ParamName::N_FACTORS, 10)
        .with(ParamName::N_EPOCHS, 100)
        .with(ParamName::LR, 0.05)
        .with(ParamName::REG, 0.06);

    // User overrides
    let overrides = Params::new().with(ParamName::N_FACTORS, 64);
    let params = defaults.overwrite(&overrides);
    println!("Params: {}", params.to_json()?);

    let n_factors = params.get_int(&ParamName::N_FACTORS, 10);
    let lr = params.get_float32(&ParamName::LR, 0.01);
    println!("Training with {n_factors} factors at lr={lr}");

    // Missing keys fall back to the default
    let seed = params.get_int64(&ParamName::RANDOM_STATE, 0);
    println!("Seed: {seed}");

    let mut grid = ParamsGrid::new()
        .with(ParamName::N_FACTORS, [16, 32, 64])?
        .with(ParamName::REG, [0.01, 0.05, 0.1])?;
    let model_defaults = ParamsGrid::new().with(ParamName::LR, [0.01, 0.05])?;
    grid.fill(&model_defaults);
    println!(
        "Grid has {} dimensions and {} combinations",
        grid.len(),
        grid.num_combinations()
    );

    let config = SearchConfig::new(StrategyKind::Grid)
        .with_direction(ObjectiveDirection::Minimize)
        .with_base(params);
    let result = config.run(grid, |trial| {
        let factors = trial.get_int(&ParamName::N_FACTORS, 0) as f32;
        let reg = trial.get_float32(&ParamName::REG, 0.0);
        let lr = trial.get_float32(&ParamName::LR, 0.0);
        // Stand-in for a validation loss
        Ok((factors / 32.0 - 1.0).abs() + reg + (lr - 0.05).abs())
    })?;

    let best = result.require_best()?;
    println!("Best score {:?} with {}", best.score, best.params.to_json()?);
    Ok(())
}
