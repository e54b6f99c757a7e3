use crate::catalog::Catalog;

pub fn render_index(catalog: &Catalog, selected: &str) -> String {
    let options: String = catalog
        .facility_keys()
        .into_iter()
        .map(|key| {
            let escaped = escape_html(key);
            let marker = if key == selected { " selected" } else { "" };
            format!(r#"<option value="{escaped}"{marker}>{escaped}</option>"#)
        })
        .collect();

    INDEX_HTML.replace("{{FACILITY_OPTIONS}}", &options)
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="fr">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Checklist Nettoyage</title>
  <style>
    :root {
      --bg-1: #eef3ee;
      --ink: #1f2a24;
      --accent: #2e7d32;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.92);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.16);
      --good: #4caf50;
      --fair: #ff9800;
      --poor: #f44336;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(135deg, var(--bg-1), #f7faf7 70%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      padding: 28px 16px 48px;
    }

    .app {
      width: min(1180px, 100%);
      margin: 0 auto;
      background: var(--card);
      border-radius: 24px;
      box-shadow: var(--shadow);
      padding: 28px;
      display: grid;
      gap: 24px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.6rem, 3vw, 2.2rem);
    }

    .form-grid,
    .panel,
    .actions {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(170px, 1fr));
      gap: 14px;
    }

    label {
      display: grid;
      gap: 6px;
      font-size: 0.85rem;
      color: #5f5c57;
    }

    input,
    select,
    textarea {
      font: inherit;
      padding: 8px 10px;
      border-radius: 10px;
      border: 1px solid rgba(47, 72, 88, 0.2);
      background: white;
    }

    .stat {
      background: white;
      border-radius: 16px;
      padding: 16px;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    .stat .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: #8b857d;
    }

    .stat .value {
      font-size: 1.6rem;
      font-weight: 600;
    }

    .value.good { color: var(--good); }
    .value.fair { color: var(--fair); }
    .value.poor { color: var(--poor); }

    table {
      width: 100%;
      border-collapse: collapse;
      font-size: 0.92rem;
    }

    th,
    td {
      padding: 8px;
      border-bottom: 1px solid rgba(47, 72, 88, 0.1);
      text-align: left;
      vertical-align: top;
    }

    tr.group td {
      background: var(--accent-2);
      color: white;
      font-weight: 600;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 12px 16px;
      font: inherit;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
    }

    button.secondary {
      background: var(--accent-2);
    }

    button.photo {
      padding: 6px 12px;
      background: #e0e7e2;
      color: var(--ink);
    }

    button.photo.has-photo {
      background: var(--good);
      color: white;
    }

    .status {
      min-height: 1.4em;
      font-weight: 600;
    }

    .status[data-type="error"] { color: var(--poor); }
    .status[data-type="success"] { color: var(--good); }
    .status[data-type="info"] { color: var(--accent-2); }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Checklist de nettoyage</h1>
      <p id="status" class="status"></p>
    </header>

    <section class="form-grid">
      <label>Hall
        <select id="facility">{{FACILITY_OPTIONS}}</select>
      </label>
      <label>Date <input id="date" type="date" data-meta="date" /></label>
      <label>Responsable <input id="responsible" type="text" data-meta="responsible" /></label>
      <label>Effectif <input id="staff-count" type="number" min="1" data-meta="staffCount" /></label>
      <label>Début <input id="start-time" type="time" data-meta="startTime" /></label>
      <label>Fin <input id="end-time" type="time" data-meta="endTime" /></label>
    </section>

    <section class="panel">
      <div class="stat"><span class="label">Taux de réalisation</span><div id="rate" class="value">0%</div></div>
      <div class="stat"><span class="label">Réalisées</span><div id="done" class="value">0/0</div></div>
      <div class="stat"><span class="label">Planifiées</span><div id="planned" class="value">0</div></div>
    </section>

    <table>
      <thead>
        <tr>
          <th>Désignation</th>
          <th>Planifié</th>
          <th>Statut</th>
          <th>Photo avant</th>
          <th>Photo après</th>
          <th>Commentaire</th>
        </tr>
      </thead>
      <tbody id="checklist"></tbody>
    </table>

    <section class="actions">
      <button id="save" type="button">Sauvegarder</button>
      <button id="reload" type="button" class="secondary">Charger</button>
      <button id="export-csv" type="button" class="secondary">Exporter CSV</button>
      <button id="share" type="button" class="secondary">Partager WhatsApp</button>
      <button id="reset" type="button" class="secondary">Tout réinitialiser</button>
    </section>

    <input id="photo-input" type="file" accept="image/*" hidden />
  </main>

  <script>
    const statusEl = document.getElementById('status');
    const bodyEl = document.getElementById('checklist');
    const facilityEl = document.getElementById('facility');
    const photoInput = document.getElementById('photo-input');
    const metaInputs = Array.from(document.querySelectorAll('[data-meta]'));
    const STATUSES = [
      ['done', 'Fait'],
      ['not-done', 'Non fait'],
      ['partial', 'Partiel']
    ];

    let pendingPhoto = null;

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
      if (message) {
        setTimeout(() => {
          if (statusEl.textContent === message) {
            setStatus('', '');
          }
        }, 5000);
      }
    };

    const escapeHtml = (value) =>
      String(value)
        .replace(/&/g, '&amp;')
        .replace(/</g, '&lt;')
        .replace(/>/g, '&gt;')
        .replace(/"/g, '&quot;');

    const renderStats = (report) => {
      const rate = document.getElementById('rate');
      rate.textContent = `${report.stats.completionRate}%`;
      rate.className = `value ${report.level}`;
      document.getElementById('done').textContent =
        `${report.stats.doneCount}/${report.stats.plannedCount}`;
      document.getElementById('planned').textContent = report.stats.plannedCount;
    };

    const renderMetadata = (report) => {
      facilityEl.value = report.facility;
      metaInputs.forEach((input) => {
        input.value = report.metadata[input.dataset.meta] ?? '';
      });
    };

    const photoButton = (task, phase, presence) => {
      const has = presence === 'present';
      return `<button type="button" class="photo ${has ? 'has-photo' : ''}"
        data-task="${escapeHtml(task.id)}" data-phase="${phase}" data-has="${has}">
        ${has ? 'Voir photo' : 'Ajouter'}</button>`;
    };

    const renderTasks = (report) => {
      let html = '';
      let group = null;
      report.tasks.forEach((task) => {
        if (task.zoneGroup !== group) {
          group = task.zoneGroup;
          html += `<tr class="group"><td colspan="6">${escapeHtml(group)}</td></tr>`;
        }
        const id = escapeHtml(task.id);
        const radios = STATUSES.map(([value, label]) => `
          <label><input type="radio" name="status-${id}" data-task="${id}" data-field="status"
            value="${value}" ${task.status === value ? 'checked' : ''} /> ${label}</label>`).join('');
        html += `<tr>
          <td>${escapeHtml(task.location)}</td>
          <td><select data-task="${id}" data-field="planned">
            <option value="no" ${task.planned === 'no' ? 'selected' : ''}>Non</option>
            <option value="yes" ${task.planned === 'yes' ? 'selected' : ''}>Oui</option>
          </select></td>
          <td>${radios}</td>
          <td>${photoButton(task, 'before', task.photoBefore)}</td>
          <td>${photoButton(task, 'after', task.photoAfter)}</td>
          <td><textarea data-task="${id}" data-field="comment"
            placeholder="Ajouter un commentaire...">${escapeHtml(task.comment)}</textarea></td>
        </tr>`;
      });
      bodyEl.innerHTML = html;
    };

    const render = (report) => {
      renderMetadata(report);
      renderStats(report);
      renderTasks(report);
    };

    const request = async (url, body) => {
      const res = await fetch(url, {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(body ?? {})
      });
      if (!res.ok) {
        const msg = await res.text();
        throw new Error(msg || 'Requête refusée');
      }
      const data = await res.json();
      if (data.notice) {
        setStatus(data.notice.message, data.notice.level);
      }
      return data.report;
    };

    const loadReport = async () => {
      const res = await fetch('/api/report');
      if (!res.ok) {
        throw new Error('Impossible de charger le rapport');
      }
      render(await res.json());
    };

    const fail = (err) => setStatus(err.message, 'error');

    facilityEl.addEventListener('change', () => {
      request('/api/facility', { facility: facilityEl.value }).then(render).catch(fail);
    });

    metaInputs.forEach((input) => {
      input.addEventListener('change', () => {
        const key = input.dataset.meta;
        if (key === 'date' && !input.value) {
          return;
        }
        const value = key === 'staffCount' ? Number(input.value) || 1 : input.value;
        request('/api/metadata', { [key]: value }).then(renderStats).catch(fail);
      });
    });

    // Comments go out once per edit, on blur.
    bodyEl.addEventListener('change', (event) => {
      const el = event.target;
      const field = el.dataset.field;
      if (!field) {
        return;
      }
      request('/api/task', { id: el.dataset.task, change: { field, value: el.value } })
        .then(renderStats)
        .catch(fail);
    });

    bodyEl.addEventListener('click', (event) => {
      const btn = event.target.closest('button.photo');
      if (!btn) {
        return;
      }
      const { task, phase, has } = btn.dataset;
      if (has === 'true') {
        const query = new URLSearchParams({ id: task, phase });
        window.open(`/api/photo?${query}`, '_blank');
        return;
      }
      pendingPhoto = { id: task, phase };
      photoInput.click();
    });

    photoInput.addEventListener('change', () => {
      const file = photoInput.files[0];
      const target = pendingPhoto;
      photoInput.value = '';
      if (!file || !target) {
        return;
      }
      const reader = new FileReader();
      reader.onload = () => {
        const data = String(reader.result).split(',')[1] || '';
        request('/api/photo', { ...target, contentType: file.type, data })
          .then(render)
          .catch(fail);
      };
      reader.readAsDataURL(file);
    });

    document.getElementById('save').addEventListener('click', () => {
      request('/api/save').then(render).catch(fail);
    });

    document.getElementById('reload').addEventListener('click', () => {
      request('/api/reload').then(render).catch(fail);
    });

    document.getElementById('reset').addEventListener('click', () => {
      if (confirm('Êtes-vous sûr de vouloir tout réinitialiser?')) {
        request('/api/reset').then(render).catch(fail);
      }
    });

    document.getElementById('export-csv').addEventListener('click', () => {
      window.location.href = '/api/export/csv';
    });

    document.getElementById('share').addEventListener('click', async () => {
      try {
        const res = await fetch('/api/share');
        const share = await res.json();
        window.open(share.url, '_blank');
      } catch (err) {
        fail(err);
      }
    });

    loadReport().catch(fail);
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_selected_facility() {
        let html = render_index(&Catalog::builtin(), "HE03/107F");
        assert!(html.contains(r#"<option value="HE03/107F" selected>HE03/107F</option>"#));
        assert!(html.contains(r#"<option value="HE06 JFC4/107D">HE06 JFC4/107D</option>"#));
        assert!(!html.contains("{{FACILITY_OPTIONS}}"));
    }

    #[test]
    fn comment_edits_are_sent_on_change_only() {
        assert!(!INDEX_HTML.contains("addEventListener('input'"));
        assert!(INDEX_HTML.contains("bodyEl.addEventListener('change'"));
    }
}
