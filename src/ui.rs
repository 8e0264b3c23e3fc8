use crate::models::ControllerSnapshot;

pub fn render_index(snapshot: &ControllerSnapshot) -> String {
    let initial = serde_json::to_string(snapshot)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/");
    INDEX_HTML
        .replace("{{STREAK}}", &snapshot.streak.to_string())
        .replace("{{INITIAL_STATE}}", &initial)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Void</title>
  <style>
    :root {
      --bg: #0b1224;
      --surface: rgba(22, 33, 66, 0.85);
      --ink: #f1f4ff;
      --soft: #b9c4ea;
      --accent: #8fb3ff;
      --danger: #ff8d8d;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(180deg, #14204a, #111c3b 50%, var(--bg));
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      padding: 40px 18px 64px;
    }

    .app {
      width: min(820px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    header {
      display: flex;
      flex-wrap: wrap;
      justify-content: space-between;
      gap: 12px;
    }

    .pill {
      display: inline-flex;
      gap: 8px;
      border: 1px solid rgba(143, 179, 255, 0.4);
      border-radius: 999px;
      padding: 8px 16px;
      color: var(--soft);
      font-size: 0.9rem;
    }

    .card {
      background: var(--surface);
      border-radius: 24px;
      padding: 28px;
      display: grid;
      gap: 16px;
    }

    .banner {
      border: 1px solid rgba(255, 141, 141, 0.5);
      background: rgba(255, 80, 80, 0.1);
      color: var(--danger);
      border-radius: 18px;
      padding: 16px;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 12px 22px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: var(--bg);
    }

    button.ghost {
      background: transparent;
      color: var(--accent);
      border: 1px solid var(--accent);
    }

    button:disabled {
      opacity: 0.4;
      cursor: not-allowed;
    }

    input, select, textarea {
      width: 100%;
      border-radius: 10px;
      border: 1px solid rgba(255, 255, 255, 0.15);
      background: var(--bg);
      color: var(--ink);
      padding: 10px 12px;
      font: inherit;
    }

    label span {
      display: block;
      margin-bottom: 6px;
      font-size: 0.8rem;
      letter-spacing: 0.1em;
      text-transform: uppercase;
      color: var(--soft);
    }

    .breath {
      width: 140px;
      height: 140px;
      margin: 0 auto;
      border-radius: 50%;
      border: 3px solid var(--accent);
      display: grid;
      place-items: center;
      transition: transform 0.2s ease-out;
    }

    .row {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
    }

    [hidden] {
      display: none !important;
    }

    footer {
      display: flex;
      flex-wrap: wrap;
      justify-content: space-between;
      gap: 12px;
      font-size: 0.8rem;
      color: var(--soft);
    }

    footer a {
      color: var(--soft);
    }

    .overlay {
      position: fixed;
      inset: 0;
      background: rgba(0, 0, 0, 0.7);
      display: grid;
      place-items: center;
      padding: 16px;
    }

    .overlay .card {
      max-width: 520px;
      color: var(--soft);
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <div class="row">
        <span class="pill">🔥 <span id="streak">{{STREAK}}</span> day streak</span>
        <span class="pill" id="reminder" hidden></span>
      </div>
      <div class="row">
        <span class="pill" id="history"></span>
        <button type="button" class="ghost" id="privacy-open">Privacy &amp; contact</button>
      </div>
    </header>

    <div class="banner" id="banner" hidden></div>

    <section class="card" id="welcome" hidden>
      <h2>Welcome to Void</h2>
      <p>A calm one-page mindfulness companion. Set it up for you to begin.</p>
      <div><button data-action="onboarding/open">Personalize my calm</button></div>
    </section>

    <form class="card" id="onboarding" hidden>
      <h2>Let's personalize your calm.</h2>
      <label><span>Name</span><input name="name" placeholder="How should we greet you?" /></label>
      <label><span>Goal</span>
        <select name="goal"><option>Relax</option><option>Focus</option><option>Sleep</option></select>
      </label>
      <label><span>How are you feeling? (1-5)</span><input name="mood" type="range" min="1" max="5" value="3" /></label>
      <label><span>Session length</span>
        <select name="length"><option value="3">3 min</option><option value="5" selected>5 min</option><option value="10">10 min</option></select>
      </label>
      <label><span>Preferred reminder time</span><input name="reminder" type="time" value="08:00" /></label>
      <div class="row">
        <button type="submit">Save &amp; continue</button>
        <button type="button" class="ghost" data-action="onboarding/close">Close</button>
      </div>
    </form>

    <section class="card" id="home" hidden>
      <h1 id="greeting"></h1>
      <p id="today"></p>
      <p id="tip" hidden></p>
      <div><button id="start" data-action="session/start"></button></div>
      <details id="last-note" hidden><summary>Last journal note</summary><p></p></details>
    </section>

    <section class="card" id="session" hidden>
      <div class="row">
        <h2>Your guided session</h2>
        <button class="ghost" id="play" data-action="playback/toggle"></button>
      </div>
      <p id="no-speech" hidden>Voice playback isn't available here. Read the script below to guide yourself.</p>
      <div class="breath" id="breath">Inhale</div>
      <article id="script"></article>
      <div>
        <strong>Reflection</strong>
        <p id="reflection"></p>
        <small id="micro-tip"></small>
      </div>
      <div><button data-action="session/finish">I'm done</button></div>
    </section>

    <form class="card" id="checkout" hidden>
      <h2>How do you feel now?</h2>
      <input name="mood_after" type="range" min="1" max="5" value="3" />
      <label><span>Journal (optional)</span><textarea name="notes" rows="4" placeholder="What changed for you?"></textarea></label>
      <div class="row">
        <button type="button" class="ghost" data-action="session/back">Back</button>
        <button type="submit">Save check-in</button>
      </div>
    </form>

    <section class="card" id="complete" hidden>
      <h2 id="nice-work"></h2>
      <p id="streak-now"></p>
      <p id="saved"></p>
      <div class="row">
        <button data-action="session/another">Do another session</button>
        <button class="ghost" data-action="session/another">Back home</button>
      </div>
    </section>

    <footer>
      <p>This app is wellness guidance, not medical advice.</p>
      <a href="mailto:hello@voidmindful.app">Contact</a>
    </footer>
  </main>

  <div class="overlay" id="privacy" hidden>
    <section class="card">
      <h3>Privacy</h3>
      <p>This app offers wellness guidance and is not medical advice. Your preferences and journals stay on this device. We do not track personal health data or send it anywhere.</p>
      <p>Notifications are optional and you can disable them anytime in your browser settings. For urgent help, contact your local emergency services or a trusted professional.</p>
      <div><button type="button" id="privacy-close">Close</button></div>
    </section>
  </div>

  <script>
    const $ = (id) => document.getElementById(id);
    let state = {{INITIAL_STATE}};

    const post = async (path, body) => {
      const res = await fetch(`/api/${path}`, {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: body ? JSON.stringify(body) : undefined
      });
      if (!res.ok) {
        throw new Error(await res.text());
      }
      state = await res.json();
      render();
    };

    const render = () => {
      if (!state) return;
      const profile = state.profile;
      $('streak').textContent = state.streak;
      $('reminder').hidden = !profile || !profile.reminder;
      if (profile) $('reminder').textContent = `⏰ ${profile.reminder} reminder`;
      $('history').textContent = state.history.recent_count === 0
        ? 'No sessions yet. Your streak begins today.'
        : `Last ${state.history.recent_count} days • ${state.history.checked_in_today ? 'You checked in today' : 'Tap start to check in'}`;
      $('banner').hidden = !state.banner;
      $('banner').textContent = state.banner || '';

      $('onboarding').hidden = !state.show_onboarding;
      $('welcome').hidden = state.view !== 'home' || !!profile || state.show_onboarding;
      $('home').hidden = state.view !== 'home' || !profile;
      $('session').hidden = state.view !== 'session' || !state.active_session;
      $('checkout').hidden = state.view !== 'checkout';
      $('complete').hidden = state.view !== 'complete' || !profile;

      if (profile) {
        $('greeting').textContent = `Hi, ${profile.name} 👋`;
        $('today').textContent = `Today's ${profile.goal.toLowerCase()} session is ${profile.length} minutes. Mood check: ${state.current_mood}/5.`;
        $('start').textContent = `Start my ${profile.length}-min ${profile.goal}`;
        $('nice-work').textContent = `Nice work, ${profile.name}!`;
      }
      const tip = state.active_session && state.active_session.micro_tip;
      $('tip').hidden = !tip;
      $('tip').textContent = tip ? `Tip: ${tip}` : '';
      $('last-note').hidden = !state.history.last_note;
      $('last-note').querySelector('p').textContent = state.history.last_note || '';

      if (state.active_session) {
        const sentences = state.active_session.script.split('. ');
        $('script').replaceChildren(...sentences.map((sentence) => {
          const p = document.createElement('p');
          const text = sentence.trim();
          p.textContent = text.endsWith('.') ? text : `${text}.`;
          return p;
        }));
        $('reflection').textContent = state.active_session.reflection;
        $('micro-tip').textContent = `Micro-tip: ${state.active_session.micro_tip}`;
      }
      $('play').disabled = !state.speech_supported;
      $('play').textContent = state.playing ? 'Pause voice' : 'Play guidance';
      $('no-speech').hidden = state.speech_supported;

      $('checkout').elements.mood_after.value = state.current_mood;
      $('streak-now').textContent = `Your streak is now ${state.streak} days.`;
      $('saved').textContent = state.last_notes
        ? 'Reflection saved. Come back later to review it in history.'
        : 'Reflection saved. Want to add more? Start another session or journal more.';
    };

    document.querySelectorAll('[data-action]').forEach((button) => {
      button.addEventListener('click', () => post(button.dataset.action).catch(console.error));
    });

    $('onboarding').addEventListener('submit', (event) => {
      event.preventDefault();
      const form = event.target.elements;
      post('onboarding', {
        name: form.name.value,
        goal: form.goal.value,
        length: Number(form.length.value),
        reminder: form.reminder.value,
        mood: Number(form.mood.value)
      }).catch(console.error);
    });

    $('checkout').addEventListener('submit', (event) => {
      event.preventDefault();
      const form = event.target.elements;
      post('checkout', {
        mood_after: Number(form.mood_after.value),
        notes: form.notes.value
      }).then(() => { form.notes.value = ''; }).catch(console.error);
    });

    $('privacy-open').addEventListener('click', () => { $('privacy').hidden = false; });
    $('privacy-close').addEventListener('click', () => { $('privacy').hidden = true; });

    const phases = [['Inhale', 4000], ['Hold', 4000], ['Exhale', 6000]];
    let phase = 0;
    let elapsed = 0;
    setInterval(() => {
      elapsed += 200;
      if (elapsed >= phases[phase][1]) {
        phase = (phase + 1) % phases.length;
        elapsed = 0;
      }
      const progress = Math.min(1, elapsed / phases[phase][1]);
      $('breath').textContent = phases[phase][0];
      $('breath').style.transform = `scale(${0.9 + progress * 0.1})`;
    }, 200);

    setInterval(() => {
      if (!state || !state.playing) return;
      fetch('/api/state').then((res) => res.json()).then((next) => { state = next; render(); }).catch(console.error);
    }, 1000);

    render();
  </script>
</body>
</html>
"#;
