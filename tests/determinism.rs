use fidelitty::{Context, ContextConfig, UnicodePixel};

const GRID: (u16, u16) = (23, 11);

/// Deterministic pseudo-random bytes (xorshift).
fn noise(len: usize, mut state: u32) -> Vec<u8> {
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect()
}

fn render(worker_threads: usize, input: &[u8]) -> Vec<UnicodePixel> {
    let mut context = Context::with_config(&ContextConfig {
        max_pipelines: 1,
        worker_threads: Some(worker_threads),
    })
    .expect("context");
    let handle = context
        .create_render_pipeline(GRID.0, GRID.1)
        .expect("pipeline");
    context
        .pipeline_mut(handle)
        .unwrap()
        .input_surface_mut()
        .unwrap()
        .copy_from_slice(input);
    context.execute_all(handle).expect("dispatch");
    context.wait(handle).expect("execution");
    context
        .pipeline(handle)
        .unwrap()
        .output_surface()
        .unwrap()
        .to_vec()
}

fn input_len() -> usize {
    usize::from(GRID.0) * fidelitty::patch_width() as usize * usize::from(GRID.1)
        * fidelitty::patch_height() as usize
        * 3
}

#[test]
fn output_is_identical_for_any_worker_count() {
    let input = noise(input_len(), 0x9e37_79b9);
    let single = render(1, &input);
    assert!(single.iter().all(|cell| cell.codepoint != 0));
    for threads in [2, 4, 7] {
        assert_eq!(
            render(threads, &input),
            single,
            "{threads} workers diverged from a single worker"
        );
    }
}

#[test]
fn repeated_runs_are_identical() {
    let input = noise(input_len(), 42);
    assert_eq!(render(4, &input), render(4, &input));
}

#[test]
fn every_cell_uses_a_dictionary_glyph() {
    let input = noise(input_len(), 7);
    let dictionary = fidelitty::GlyphDictionary::standard();
    for cell in render(3, &input) {
        assert!(dictionary.get(cell.codepoint).is_some(), "{:#x}", cell.codepoint);
    }
}
