//! The BlazorGameEngine architecture deck.

use super::record::{BuildOptions, SlideRecord};
use super::source::Deck;

/// File name the deck is written to when no output path is given.
pub const DEFAULT_OUTPUT_FILE: &str = "BlazorGameEngine_Presentation.pptx";

type RawSlide = (&'static str, &'static [&'static str], &'static str);

const SLIDES: [RawSlide; 15] = [
    (
        "BlazorGameEngine - Architettura Interna",
        &[
            "Engine 2D per Blazor + HTML5 Canvas",
            "API ispirata a GameMaker, type-safe in C#",
            "Progettato per performance: batching, DI, async",
        ],
        "Introduzione rapida: obiettivo della presentazione e target audience: sviluppatori C# / Blazor interessati a game engine 2D.",
    ),
    (
        "Agenda",
        &[
            "Architettura generale",
            "Game loop e interop JavaScript",
            "Gestione input, rendering e fisica",
            "Dependency Injection per asset e GameObject",
            "Performance, limitazioni e roadmap",
        ],
        "Dire il percorso della presentazione e quanto tempo per demo/domande.",
    ),
    (
        "Architettura High-level",
        &[
            "Blazor Component (GameView) ↔ Game (C#) ↔ Canvas2D (JS)",
            "Game loop gestito da JavaScript con requestAnimationFrame",
            "Batching Canvas2D per ridurre l'overhead di interop",
        ],
        "Mostrare diapositiva/diagramma a blocchi. Evidenziare responsabilità di ogni layer.",
    ),
    (
        "Game Loop & JS Interop",
        &[
            "Loop: JS invoke C# frame handler + requestAnimationFrame",
            "Limitazione FPS con setTimeout per target rate",
            "Sequenza: render -> update -> input state snapshot",
        ],
        "Spiegare perché il loop è in JS: timing preciso e sincronizzazione col browser.",
    ),
    (
        "Esempio: ExecuteFrameAsync (sequenza)",
        &[
            "Aggiorna mouse, snapshot istanze",
            "Fase di rendering: OnDrawAsync + GameObject.OnDrawAsync",
            "Fase di update: OnStepAsync + GameObject.ExecuteStepAsync",
            "Salva stato input e aggiorna controllerHub",
        ],
        "Mostrare snippet semplificato (solo pseudocodice) e spiegare uso di ToArray() per evitare concorrenza.",
    ),
    (
        "Gestione Input: Pattern 'Previous State'",
        &[
            "Doppio buffer: current vs previous per tasti e mouse",
            "Check: hold | CheckPressed: edge detect | CheckReleased",
            "Permette logiche frame-accurate (es. single-tap)",
        ],
        "Mostrare tabella esemplificativa di frame con space key. Sottolineare semplicità e robustezza.",
    ),
    (
        "GameObject & Dependency Injection",
        &[
            "Istanzia con ActivatorUtilities + reflection per init-only",
            "GameObject riceve dipendenze via DI (asset, servizi)",
            "OnCreate callback e proprietà immutabili OriginalX/OriginalY",
        ],
        "Spiegare il vantaggio: testabilità, iniezione di asset e servizi condivisi.",
    ),
    (
        "Rendering: Sprite, Transform, Batching",
        &[
            "Distinzione ImageAsset vs SpriteAsset (sheet frames)",
            "DrawSprite calcola imageX/imageY; supporto scale/rotate",
            "BeginBatch/EndBatch per minimizzare round-trips JS↔C#",
        ],
        "Mostrare esempio di calcolo frame e ricordare l'ottimizzazione con batching.",
    ),
    (
        "Fisica e Collisioni",
        &[
            "AABB per collision detection (IsCollidingWith)",
            "MoveContactSolid: movimento con stop al contatto (pixel-step)",
            "MoveOutsideSolid per espulsione da overlapping",
        ],
        "Discutere trade-off: semplicità vs precisione (no pixel-perfect). Possibili ottimizzazioni: spatial hashing.",
    ),
    (
        "Asset Management & Registrazione DI",
        &[
            "Estensione: AddSprite<T> registra come T, SpriteAsset, IGameAsset",
            "Auto-discovery con reflection sull'assembly",
            "Consente enumerazione e iniezione forte-typed",
        ],
        "Sottolineare pattern per scalabilità e facilità d'uso per game devs.",
    ),
    (
        "Tipo Angle e Safety",
        &[
            "Struct Angle con factory FromDegrees/FromRadians",
            "Metodi Sin/Cos e operatori per composizione",
            "Evita ambiguità gradi vs radianti nel codice",
        ],
        "Mostrare breve snippet. Spiegare beneficio in refactoring e leggibilità.",
    ),
    (
        "Performance & Ottimizzazioni",
        &[
            "Ridurre overhead interop con batching",
            "Usare snapshot ToArray per evitare lock durante iterazioni",
            "Possibili futuri: WebGL, object pooling, spatial hashing",
        ],
        "Dare numeri qualitativi: quanti draw calls si possono ridurre con batching.",
    ),
    (
        "Limitazioni e Roadmap",
        &[
            "Single-threaded (Blazor WASM)",
            "No ECS, collision AABB solo",
            "Evoluzioni: WebGL, pooling, streaming asset",
        ],
        "Discutere trade-offs e possibili PR/feature requests.",
    ),
    (
        "Demo / Come eseguire il gioco",
        &[
            "Aprire soluzione `ChristmasJumpGame.slnx` in Visual Studio",
            "Eseguire `ChristmasJumpGame` (profilo Development)",
            "Per generare slide: installare `python-pptx` e lanciare lo script",
        ],
        "Fornire comandi rapidi per ambiente Windows / PowerShell.",
    ),
    (
        "Domande e Risorse",
        &[
            "Repository: percorso locale del progetto",
            "File di riferimento: `BlazorGameEngine-Architecture.md`",
            "Contatti: chiedimi per approfondimenti o demo estese",
        ],
        "Aprire Q&A. Incoraggiare domande architetturali e su ottimizzazioni.",
    ),
];

/// The 15 slides of the deck, in presentation order.
pub fn default_records() -> Vec<SlideRecord> {
    SLIDES
        .iter()
        .map(|(title, bullets, notes)| SlideRecord::new(title, bullets, notes))
        .collect()
}

/// The built-in deck with default build options.
pub fn default_deck() -> Deck {
    Deck {
        options: BuildOptions::default(),
        slides: default_records(),
    }
}
