//! Builder del `PipelineEngine`, seguro en tiempo de compilación.
//!
//! Obliga a declarar primero una fuente y a encadenar stages cuyos tipos de
//! entrada y salida sean compatibles:
//! - `EngineBuilderInit` es el estado inicial (stores presentes).
//! - `EngineBuilder<S, L, R>` conserva el tipo de salida del último stage
//!   (`S::Output`, vía `PhantomData`) y la lista de stages boxeados.
//! - `add_stage` exige `N::Input: SameAs<S::Output>`.

use std::fmt::Debug;
use std::marker::PhantomData;

use crate::engine::PipelineEngine;
use crate::event::RunLog;
use crate::repo::RunRepository;
use crate::stage::{SameAs, StageDefinition, TypedStage};

/// Estado inicial del builder: stores listos, sin stages declarados.
pub struct EngineBuilderInit<L: RunLog, R: RunRepository> {
    pub run_log: L,
    pub repository: R,
}

impl<L: RunLog, R: RunRepository> EngineBuilderInit<L, R> {
    /// Declara el primer stage del pipeline; conceptualmente debe ser una
    /// fuente (aserción de desarrollo, desactivada en release).
    #[inline]
    pub fn first_stage<S>(self, stage: S) -> EngineBuilder<S, L, R>
        where S: TypedStage + Debug + 'static
    {
        debug_assert!(matches!(stage.kind(), crate::stage::StageKind::Source),
                      "el primer stage debe ser Source");

        EngineBuilder { run_log: self.run_log,
                        repository: self.repository,
                        stages: vec![Box::new(stage)],
                        _out: PhantomData::<S::Output> }
    }
}

pub struct EngineBuilder<S: TypedStage + Debug + 'static, L: RunLog, R: RunRepository> {
    run_log: L,
    repository: R,
    stages: Vec<Box<dyn StageDefinition>>,
    _out: PhantomData<S::Output>,
}

impl<S: TypedStage + Debug + 'static, L: RunLog, R: RunRepository> EngineBuilder<S, L, R> {
    /// Añade el siguiente stage; la entrada de `N` debe coincidir con la
    /// salida del stage anterior.
    #[inline]
    pub fn add_stage<N>(mut self, next: N) -> EngineBuilder<N, L, R>
        where N: TypedStage + Debug + 'static,
              N::Input: SameAs<S::Output>
    {
        self.stages.push(Box::new(next));
        EngineBuilder { run_log: self.run_log,
                        repository: self.repository,
                        stages: self.stages,
                        _out: PhantomData }
    }

    /// Construye el motor con la definición derivada de los stages.
    #[inline]
    pub fn build(self) -> PipelineEngine<L, R> {
        let mut engine = PipelineEngine::with_stores(self.run_log, self.repository);
        let definition = crate::repo::build_pipeline_definition(self.stages);
        engine.set_default_definition(definition);
        engine
    }
}
