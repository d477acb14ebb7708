use crate::models::{DerivedSummary, Streak};
use crate::window::STANDARD_LAST_N;

pub fn render_index(weekly: &DerivedSummary, monthly: &DerivedSummary, streak: Streak) -> String {
    let chart_buttons: String = STANDARD_LAST_N
        .iter()
        .map(|n| format!(r#"<button type="button" class="range-btn" data-last="{n}">Last {n}</button>"#))
        .collect();
    INDEX_HTML
        .replace("{{WEEKLY}}", &format_summary(weekly))
        .replace("{{MONTHLY}}", &format_summary(monthly))
        .replace("{{STREAK}}", &streak.current.to_string())
        .replace("{{LONGEST}}", &streak.longest.to_string())
        .replace("{{LAST_DAY}}", &last_day_label(&streak))
        .replace("{{RANGES}}", &chart_buttons)
}

fn last_day_label(streak: &Streak) -> String {
    match streak.last_day {
        Some(day) => format!("last recorded {day}"),
        None => "nothing recorded yet".to_string(),
    }
}

/// HTML fragment for a window summary; empty windows say so instead of
/// printing averages.
pub fn format_summary(summary: &DerivedSummary) -> String {
    let Some(averages) = &summary.averages else {
        return "<p class=\"empty\">No data for this period yet.</p>".to_string();
    };

    let mut html = format!(
        "<p>Entries: {}</p>\n\
         <p>Total Steps: {}</p>\n\
         <p>Total Calories Burned: {}</p>\n\
         <p>Total Water Consumed: {} glasses</p>\n\
         <p>Average Sleep: {:.2} hours per day</p>\n\
         <p>Average Active Minutes: {:.1}</p>\n\
         <p>Average Mood: {:.1} / 10</p>\n",
        summary.entry_count,
        summary.total_steps,
        summary.total_calories,
        summary.total_water,
        averages.sleep,
        averages.active_minutes,
        averages.mood,
    );
    if let Some(weight) = summary.latest_weight {
        html.push_str(&format!("<p>Latest Weight: {weight:.1} kg</p>\n"));
    }
    if let Some(stress) = summary.average_stress {
        html.push_str(&format!("<p>Average Stress: {stress:.0} / 100</p>\n"));
    }
    html
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Fitness Tracker</title>
  <style>
    :root {
      --bg: #eef4f1;
      --ink: #1f2d2a;
      --accent: #2a9d8f;
      --warn: #e76f51;
      --card: #ffffff;
      --shadow: 0 18px 40px rgba(31, 45, 42, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(160deg, var(--bg), #d8ebe4);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 28px 16px 40px;
    }

    .app {
      width: min(900px, 100%);
      background: var(--card);
      border-radius: 22px;
      box-shadow: var(--shadow);
      padding: 32px;
      display: grid;
      gap: 24px;
    }

    form {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(150px, 1fr));
      gap: 12px;
    }

    label {
      display: grid;
      gap: 4px;
      font-size: 0.9rem;
    }

    input {
      padding: 8px 10px;
      border: 1px solid #b7cfc8;
      border-radius: 10px;
    }

    button {
      border: 0;
      border-radius: 12px;
      padding: 10px 14px;
      background: var(--accent);
      color: white;
      cursor: pointer;
    }

    .tabs {
      display: flex;
      gap: 8px;
    }

    .tab-content {
      display: none;
    }

    .tab-content.active {
      display: block;
    }

    .chart {
      margin-bottom: 14px;
    }

    .chart-bar {
      background: var(--accent);
      color: white;
      margin: 3px 0;
      padding: 2px 6px;
      border-radius: 6px;
      min-width: 2rem;
    }

    #status.error {
      color: var(--warn);
    }

    .empty {
      color: #6b7d78;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Fitness Tracker</h1>
      <p>Current streak: <strong id="streak">{{STREAK}}</strong> days (longest {{LONGEST}}, {{LAST_DAY}})</p>
    </header>

    <form id="track-form" method="post" action="/track">
      <label>Steps <input name="steps" inputmode="numeric" required /></label>
      <label>Calories burned <input name="calories" inputmode="numeric" required /></label>
      <label>Water (glasses) <input name="water" inputmode="numeric" required /></label>
      <label>Sleep (hours) <input name="sleep" inputmode="decimal" required /></label>
      <label>Weight (kg) <input name="weight" inputmode="decimal" required /></label>
      <label>Mood (0-10) <input name="mood" inputmode="numeric" required /></label>
      <label>Active minutes <input name="active_minutes" inputmode="numeric" required /></label>
      <label>Activities <input name="activities" placeholder="walk, yoga" /></label>
      <button type="submit">Track today</button>
      <button type="button" id="wearable-btn">Sync wearable</button>
    </form>
    <p id="status" role="status"></p>

    <nav class="tabs">
      <button type="button" class="tab-btn" data-tab="weekly">Weekly</button>
      <button type="button" class="tab-btn" data-tab="monthly">Monthly</button>
      <button type="button" class="tab-btn" data-tab="charts">Charts</button>
    </nav>
    <section id="weekly" class="tab-content active">{{WEEKLY}}</section>
    <section id="monthly" class="tab-content">{{MONTHLY}}</section>
    <section id="charts" class="tab-content">
      <div class="ranges">{{RANGES}}</div>
      <div id="progress-charts"></div>
    </section>

    <footer>
      <a href="/api/export">Export data</a>
    </footer>
  </main>

  <script>
    const statusEl = document.getElementById('status');
    const form = document.getElementById('track-form');

    const setStatus = (text, kind) => {
      statusEl.textContent = text;
      statusEl.className = kind || '';
    };

    const renderCharts = (series) => {
      const container = document.getElementById('progress-charts');
      container.innerHTML = '';
      series.forEach((metric) => {
        const chart = document.createElement('div');
        chart.className = 'chart';
        const title = document.createElement('div');
        title.textContent = metric.title;
        chart.appendChild(title);
        metric.points.forEach((point) => {
          const bar = document.createElement('div');
          bar.className = 'chart-bar';
          bar.style.width = `${point.width_percent}%`;
          bar.textContent = point.value;
          chart.appendChild(bar);
        });
        container.appendChild(chart);
      });
    };

    const loadCharts = async (last) => {
      const res = await fetch(`/api/charts?last=${last}`);
      if (!res.ok) {
        throw new Error('Unable to load charts');
      }
      renderCharts(await res.json());
    };

    form.addEventListener('submit', async (event) => {
      event.preventDefault();
      const body = Object.fromEntries(new FormData(form).entries());
      const res = await fetch('/api/entries', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(body)
      });
      if (!res.ok) {
        setStatus(await res.text(), 'error');
        return;
      }
      const result = await res.json();
      const rewards = result.newly_unlocked.length
        ? ` Unlocked: ${result.newly_unlocked.join(', ')}!`
        : '';
      setStatus(result.message + rewards, 'ok');
      setTimeout(() => window.location.reload(), 1500);
    });

    document.getElementById('wearable-btn').addEventListener('click', async () => {
      const res = await fetch('/api/wearable/sync', { method: 'POST' });
      if (!res.ok) {
        setStatus(await res.text(), 'error');
        return;
      }
      const reading = await res.json();
      form.elements.steps.value = reading.steps;
      form.elements.calories.value = reading.calories_burned;
      form.elements.active_minutes.value = reading.active_minutes;
      form.elements.sleep.value = reading.sleep_hours;
      setStatus('Wearable data loaded', 'ok');
    });

    document.querySelectorAll('.tab-btn').forEach((button) => {
      button.addEventListener('click', () => {
        document.querySelectorAll('.tab-content').forEach((c) => c.classList.remove('active'));
        document.getElementById(button.dataset.tab).classList.add('active');
      });
    });

    document.querySelectorAll('.range-btn').forEach((button) => {
      button.addEventListener('click', () => {
        loadCharts(button.dataset.last).catch((err) => setStatus(err.message, 'error'));
      });
    });

    loadCharts(7).catch((err) => setStatus(err.message, 'error'));
  </script>
</body>
</html>
"#;
