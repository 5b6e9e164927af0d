//! Built-in sessions.

use stillwater::{MuscleGroup, PhaseScript, Script, ScriptError, SessionScript, SoundscapeId};

pub fn breathing() -> Result<SessionScript, ScriptError> {
    let script = Script::builder("evening-breath", 120)
        .title("Evening breathing")
        .step(0, "Welcome. Settle into a comfortable position and let your eyes close.")
        .with_label("Settle in")
        .with_ambient(SoundscapeId::Ocean)
        .step(15, "Breathe in slowly through your nose, counting to four.")
        .with_label("Breathe in")
        .with_visual_cue("expand")
        .step(25, "Hold gently, then breathe out through your mouth for six.")
        .with_label("Breathe out")
        .with_visual_cue("contract")
        .step(45, "Keep this rhythm. Notice the sound of the waves.")
        .with_label("Keep the rhythm")
        .step(75, "Let the breath find its own pace now.")
        .with_label("Natural breath")
        .with_ambient(SoundscapeId::Rain)
        .step(105, "When you are ready, slowly open your eyes.")
        .with_label("Return")
        .build()?;
    Ok(script.into())
}

pub fn relaxation() -> Result<SessionScript, ScriptError> {
    let groups = vec![
        MuscleGroup::new(
            "Hands",
            "Make tight fists and hold.",
            "Open your hands and let the tension drain away.",
            7,
            15,
            "arms",
        ),
        MuscleGroup::new(
            "Shoulders",
            "Lift your shoulders up towards your ears.",
            "Let them drop. Feel the warmth spread.",
            7,
            15,
            "upper body",
        ),
        MuscleGroup::new(
            "Face",
            "Scrunch up your whole face.",
            "Soften your forehead, your jaw, your eyes.",
            5,
            15,
            "head",
        ),
    ];
    let script = PhaseScript::new("pmr-short", groups).with_soundscape(SoundscapeId::Drone);
    script.validate()?;
    Ok(script.into())
}
