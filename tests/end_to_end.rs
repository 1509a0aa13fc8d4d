use fidelitty::{patch_height, patch_width, Context};

#[test]
fn solid_image_renders_full_blocks() {
    let color = [37, 142, 201];
    let mut context = Context::new(1).expect("context");
    let handle = context.create_render_pipeline(2, 2).expect("pipeline");

    let input = context
        .pipeline_mut(handle)
        .unwrap()
        .input_surface_mut()
        .unwrap();
    assert_eq!(
        input.len(),
        2 * patch_width() as usize * 2 * patch_height() as usize * 3
    );
    for px in input.chunks_exact_mut(3) {
        px.copy_from_slice(&color);
    }

    context.execute_all(handle).expect("dispatch");
    context.wait(handle).expect("execution");

    let output = context.pipeline(handle).unwrap().output_surface().unwrap();
    assert_eq!(output.len(), 4);
    for cell in output {
        assert_eq!(cell.codepoint, 0x2588);
        assert_eq!(cell.symbol(), Some('█'));
        assert_eq!(cell.foreground, color);
        assert_eq!(cell.background, color);
    }

    context.destroy_render_pipeline(handle).expect("destroy");
    context.destroy().expect("shutdown");
}

#[test]
fn sampled_two_tone_image_becomes_half_blocks() {
    let red = [230, 20, 20];
    let blue = [20, 20, 230];
    // 16x16 source: left half red, right half blue.
    let source = (0..16 * 16)
        .flat_map(|i| if i % 16 < 8 { red } else { blue })
        .collect::<Vec<_>>();

    let mut context = Context::new(1).expect("context");
    let handle = context.create_render_pipeline(1, 1).expect("pipeline");
    context
        .pipeline_mut(handle)
        .unwrap()
        .sample_from(&source, 16, 16)
        .expect("sample");
    context.execute_all(handle).expect("dispatch");
    context.wait(handle).expect("execution");

    let cell = context.pipeline(handle).unwrap().output_surface().unwrap()[0];
    assert_eq!(cell.codepoint, 0x258C);
    assert_eq!(cell.foreground, red);
    assert_eq!(cell.background, blue);
}
